//! Chart file provenance.
//!
//! Which code table applies to a chart is decided by where the chart came
//! from, never by the values it contains: percentage and SIGRID codes
//! overlap, so content-based guessing is unreliable.

use crate::table::ChartEncoding;
use icechart_common::{IceChartError, IceChartResult, MaskedGrid};
use std::path::Path;

/// Highest raw value of a binary chart that is a concentration. Larger
/// values flag fast ice (108), undigitized areas (157), areas not covered
/// (253) and land (254).
pub const BIN_MAX_CONCENTRATION: u8 = 100;

/// Fill value written by the rasterizer into cells no polygon covers.
pub const RASTER_NODATA: u8 = 200;

/// Land rolls (`LL`) in SIGRID text charts. Raw `99` stays the
/// undetermined code.
pub const SIGRID_LAND: u8 = 255;

/// Kind of ice-chart file a code grid was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSource {
    /// Weekly binary NIC chart (`.bin`).
    BinaryChart,
    /// SIGRID text chart (`.sig`); land rolls are written as `255`.
    SigridText,
    /// Rasterized shapefile (`.zip`, `.shp`) carrying SIGRID `CT` codes.
    Shapefile,
}

impl ChartSource {
    /// Determine the chart source from a file name.
    ///
    /// A trailing `.gz` is ignored, matching compressed downloads.
    pub fn from_path(path: impl AsRef<Path>) -> IceChartResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_lowercase())
            .ok_or_else(|| {
                IceChartError::InvalidConfig(format!("Not a chart file name: {:?}", path))
            })?;
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("bin") => Ok(ChartSource::BinaryChart),
            Some("sig") => Ok(ChartSource::SigridText),
            Some("zip") | Some("shp") => Ok(ChartSource::Shapefile),
            _ => Err(IceChartError::InvalidConfig(format!(
                "Cannot determine chart format of {:?}",
                path
            ))),
        }
    }

    /// Encoding of the codes in this kind of chart.
    pub fn encoding(&self) -> ChartEncoding {
        match self {
            ChartSource::BinaryChart => ChartEncoding::BinInterval,
            ChartSource::SigridText | ChartSource::Shapefile => ChartEncoding::Sigrid,
        }
    }

    /// Name of the built-in table for this kind of chart.
    pub fn table_name(&self) -> &'static str {
        self.encoding().default_table_name()
    }

    /// Wrap raw chart bytes in a grid, masking the source's non-data values.
    pub fn prepare(&self, width: usize, height: usize, raw: Vec<u8>) -> IceChartResult<MaskedGrid<u8>> {
        let grid = MaskedGrid::from_values(width, height, raw)?;
        Ok(match self {
            ChartSource::BinaryChart => grid.mask_where(|v| v > BIN_MAX_CONCENTRATION),
            ChartSource::Shapefile => grid.mask_where(|v| v == RASTER_NODATA),
            ChartSource::SigridText => grid.mask_where(|v| v == SIGRID_LAND),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            ChartSource::from_path("/data/nic_weekly_2005_01_04_tot_v0_nh.bin").unwrap(),
            ChartSource::BinaryChart
        );
        assert_eq!(
            ChartSource::from_path("antarc050104.sig.gz").unwrap(),
            ChartSource::SigridText
        );
        assert_eq!(
            ChartSource::from_path("ARCTIC170102.ZIP").unwrap(),
            ChartSource::Shapefile
        );
        assert!(ChartSource::from_path("ice_conc_nh_201701021200.nc").is_err());
        assert!(ChartSource::from_path("/").is_err());
    }

    #[test]
    fn test_encoding() {
        assert_eq!(ChartSource::BinaryChart.encoding(), ChartEncoding::BinInterval);
        assert_eq!(ChartSource::Shapefile.table_name(), "sigrid");
    }

    #[test]
    fn test_prepare_binary_masks_flags() {
        let grid = ChartSource::BinaryChart
            .prepare(6, 1, vec![0, 55, 100, 108, 157, 254])
            .unwrap();
        assert_eq!(
            grid.cells(),
            &[Some(0), Some(55), Some(100), None, None, None]
        );
    }

    #[test]
    fn test_prepare_shapefile_masks_nodata() {
        let grid = ChartSource::Shapefile
            .prepare(3, 1, vec![92, 200, 255])
            .unwrap();
        assert_eq!(grid.cells(), &[Some(92), None, Some(255)]);
    }

    #[test]
    fn test_prepare_sigrid_text_masks_land() {
        let grid = ChartSource::SigridText
            .prepare(4, 1, vec![13, 255, 99, 92])
            .unwrap();
        assert_eq!(grid.cells(), &[Some(13), None, Some(99), Some(92)]);
    }
}
