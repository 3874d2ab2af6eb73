//! Choropleth region loading.
//!
//! Each geographic granularity ships as one GeoJSON feature collection
//! with polygon footprints and a precomputed tree count property per
//! feature. The loader decodes geometry into `geo-types` polygons and
//! pairs it with the count, keyed by the kind's identifier property (or
//! feature index for the hex grid, which carries none).

use crate::error::{PipelineError, Result};
use crate::models::{RegionKind, RegionStats};
use geo_types::{Geometry, MultiPolygon};
use geojson::{Feature, GeoJson};
use std::path::Path;
use tracing::info;

/// Load the region table for `kind` from its GeoJSON file under `data_root`.
pub fn load_region_stats(data_root: &Path, kind: RegionKind) -> Result<Vec<RegionStats>> {
    let path = data_root.join(kind.file_name());

    let content =
        std::fs::read_to_string(&path).map_err(|e| PipelineError::io(&path, e))?;

    let geojson: GeoJson = content
        .parse()
        .map_err(|e| PipelineError::format(&path, format!("invalid GeoJSON: {}", e)))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(PipelineError::format(
                &path,
                "expected a FeatureCollection at top level",
            ))
        }
    };

    let mut regions = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        let region_id = region_id(&path, feature, kind, index)?;
        let tree_count = tree_count(&path, feature, kind, &region_id)?;
        let geometry = polygon_geometry(&path, feature, &region_id)?;

        regions.push(RegionStats {
            region_id,
            geometry,
            tree_count,
        });
    }

    info!("Loaded {} {} regions", regions.len(), kind);
    Ok(regions)
}

/// Pull the region identifier out of a feature.
///
/// Hex cells have no identifier property and are keyed by feature index.
fn region_id(path: &Path, feature: &Feature, kind: RegionKind, index: usize) -> Result<String> {
    let Some(property) = kind.id_property() else {
        return Ok(index.to_string());
    };

    let value = feature
        .properties
        .as_ref()
        .and_then(|props| props.get(property))
        .ok_or_else(|| {
            PipelineError::format(
                path,
                format!("feature {}: missing `{}` property", index, property),
            )
        })?;

    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            PipelineError::format(
                path,
                format!("feature {}: `{}` is not a string", index, property),
            )
        })
}

/// Pull the precomputed tree count out of a feature.
fn tree_count(path: &Path, feature: &Feature, kind: RegionKind, id: &str) -> Result<u64> {
    let property = kind.count_property();
    let value = feature
        .properties
        .as_ref()
        .and_then(|props| props.get(property))
        .ok_or_else(|| {
            PipelineError::format(path, format!("region {}: missing `{}` property", id, property))
        })?;

    // Some exports carry counts as floats; accept whole-valued numbers.
    if let Some(count) = value.as_u64() {
        return Ok(count);
    }
    if let Some(float) = value.as_f64() {
        if float >= 0.0 && float.fract() == 0.0 {
            return Ok(float as u64);
        }
    }

    Err(PipelineError::format(
        path,
        format!("region {}: `{}` is not a non-negative integer", id, property),
    ))
}

/// Decode a feature's geometry into a multipolygon.
///
/// Single polygons are promoted to one-element multipolygons so every
/// region carries the same geometry type.
fn polygon_geometry(path: &Path, feature: &Feature, id: &str) -> Result<MultiPolygon<f64>> {
    let geometry = feature.geometry.as_ref().ok_or_else(|| {
        PipelineError::format(path, format!("region {}: feature has no geometry", id))
    })?;

    let decoded: Geometry<f64> = geometry.value.clone().try_into().map_err(
        |e: geojson::Error| {
            PipelineError::format(path, format!("region {}: bad geometry: {}", id, e))
        },
    )?;

    match decoded {
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon])),
        Geometry::MultiPolygon(multi) => Ok(multi),
        _ => Err(PipelineError::format(
            path,
            format!("region {}: expected polygon geometry", id),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn square(origin: f64) -> String {
        format!(
            "[[[{o},{o}],[{o},{p}],[{p},{p}],[{p},{o}],[{o},{o}]]]",
            o = origin,
            p = origin + 1.0
        )
    }

    fn write_boroughs(dir: &Path, features: &[String]) {
        let body = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        );
        fs::write(dir.join(RegionKind::Borough.file_name()), body).unwrap();
    }

    fn borough_feature(name: &str, count: u64, origin: f64) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"Boro":"{}","Count of Trees":{}}},"geometry":{{"type":"Polygon","coordinates":{}}}}}"#,
            name,
            count,
            square(origin)
        )
    }

    #[test]
    fn test_load_borough_stats() {
        let dir = tempfile::tempdir().unwrap();
        write_boroughs(
            dir.path(),
            &[
                borough_feature("Queens", 240998, 0.0),
                borough_feature("Manhattan", 64972, 2.0),
            ],
        );

        let regions = load_region_stats(dir.path(), RegionKind::Borough).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region_id, "Queens");
        assert_eq!(regions[0].tree_count, 240998);
        assert_eq!(regions[0].geometry.0.len(), 1);
        assert_eq!(regions[1].region_id, "Manhattan");
    }

    #[test]
    fn test_hex_regions_are_keyed_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let feature = |count: u64, origin: f64| {
            format!(
                r#"{{"type":"Feature","properties":{{"Count Trees":{}}},"geometry":{{"type":"Polygon","coordinates":{}}}}}"#,
                count,
                square(origin)
            )
        };
        let body = format!(
            r#"{{"type":"FeatureCollection","features":[{},{}]}}"#,
            feature(12, 0.0),
            feature(7, 2.0)
        );
        fs::write(dir.path().join(RegionKind::HexGrid.file_name()), body).unwrap();

        let regions = load_region_stats(dir.path(), RegionKind::HexGrid).unwrap();
        assert_eq!(regions[0].region_id, "0");
        assert_eq!(regions[1].region_id, "1");
        assert_eq!(regions[1].tree_count, 7);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_region_stats(dir.path(), RegionKind::Nta).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(RegionKind::Borough.file_name()),
            "not geojson",
        )
        .unwrap();

        let err = load_region_stats(dir.path(), RegionKind::Borough).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_missing_count_property_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let feature = format!(
            r#"{{"type":"Feature","properties":{{"Boro":"Queens"}},"geometry":{{"type":"Polygon","coordinates":{}}}}}"#,
            square(0.0)
        );
        write_boroughs(dir.path(), &[feature]);

        let err = load_region_stats(dir.path(), RegionKind::Borough).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("Count of Trees"));
    }

    #[test]
    fn test_point_geometry_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let feature = r#"{"type":"Feature","properties":{"Boro":"Queens","Count of Trees":5},"geometry":{"type":"Point","coordinates":[0.0,0.0]}}"#;
        write_boroughs(dir.path(), &[feature.to_string()]);

        let err = load_region_stats(dir.path(), RegionKind::Borough).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("polygon"));
    }

    #[test]
    fn test_multipolygon_geometry_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let feature = format!(
            r#"{{"type":"Feature","properties":{{"Boro":"Bronx","Count of Trees":3}},"geometry":{{"type":"MultiPolygon","coordinates":[{},{}]}}}}"#,
            square(0.0),
            square(3.0)
        );
        write_boroughs(dir.path(), &[feature]);

        let regions = load_region_stats(dir.path(), RegionKind::Borough).unwrap();
        assert_eq!(regions[0].geometry.0.len(), 2);
    }
}
