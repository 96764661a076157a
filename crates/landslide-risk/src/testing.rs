//! Synthetic landslide records for tests and demos.
//!
//! Volumes follow a known linear relation so trained coefficients can be
//! checked against it.

use rand::prelude::*;

use crate::data::{columns, Column, Frame};

pub const LANDSLIDE_TYPES: [&str; 4] = [
    "Corrida de Detritos",
    "Deslizamento Planar",
    "Fluxo de Lama",
    "Queda de Rochas",
];
pub const SOIL_TYPES: [&str; 3] = ["Argiloso", "Rochoso", "Siltoso"];
pub const VEGETATION_COVERS: [&str; 3] = ["Arbustiva", "Densa", "Rasteira"];

/// Volume added per mm of 24h precipitation.
pub const PRECIPITATION_EFFECT: f64 = 4.0;
/// Volume added per degree of slope.
pub const SLOPE_EFFECT: f64 = 12.0;
pub const BASE_VOLUME: f64 = 150.0;

fn type_effect(i: usize) -> f64 {
    [0.0, 120.0, 260.0, -80.0][i]
}

fn soil_effect(i: usize) -> f64 {
    [0.0, -150.0, 90.0][i]
}

fn vegetation_effect(i: usize) -> f64 {
    [0.0, -60.0, 40.0][i]
}

/// Generate `rows` raw landslide records.
///
/// Precipitation is uniform in `[40, 240)` mm, slope in `[10, 50)` degrees,
/// categories are uniform. `noise` is the amplitude of uniform noise added to
/// the volume.
pub fn synthetic_landslides(rows: usize, seed: u64, noise: f64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut ids = Vec::with_capacity(rows);
    let mut latitudes = Vec::with_capacity(rows);
    let mut longitudes = Vec::with_capacity(rows);
    let mut timestamps = Vec::with_capacity(rows);
    let mut precipitation = Vec::with_capacity(rows);
    let mut slope = Vec::with_capacity(rows);
    let mut kinds = Vec::with_capacity(rows);
    let mut soils = Vec::with_capacity(rows);
    let mut covers = Vec::with_capacity(rows);
    let mut volumes = Vec::with_capacity(rows);

    for r in 0..rows {
        let p = 40.0 + rng.r#gen::<f64>() * 200.0;
        let s = 10.0 + rng.r#gen::<f64>() * 40.0;
        let kind = rng.gen_range(0..LANDSLIDE_TYPES.len());
        let soil = rng.gen_range(0..SOIL_TYPES.len());
        let cover = rng.gen_range(0..VEGETATION_COVERS.len());
        let day = rng.gen_range(1..=28);
        let hour = rng.gen_range(0..24);
        let minute = rng.gen_range(0..60);

        let mut volume = BASE_VOLUME
            + PRECIPITATION_EFFECT * p
            + SLOPE_EFFECT * s
            + type_effect(kind)
            + soil_effect(soil)
            + vegetation_effect(cover);
        if noise > 0.0 {
            volume += (rng.r#gen::<f64>() * 2.0 - 1.0) * noise;
        }

        ids.push((r + 1) as f64);
        latitudes.push(-23.0 - rng.r#gen::<f64>());
        longitudes.push(-46.0 - rng.r#gen::<f64>());
        timestamps.push(Some(format!("2023-03-{day:02} {hour:02}:{minute:02}:00")));
        precipitation.push(p);
        slope.push(s);
        kinds.push(Some(LANDSLIDE_TYPES[kind].to_string()));
        soils.push(Some(SOIL_TYPES[soil].to_string()));
        covers.push(Some(VEGETATION_COVERS[cover].to_string()));
        volumes.push(volume);
    }

    let table = vec![
        Column::numeric(columns::ID, ids),
        Column::numeric(columns::LATITUDE, latitudes),
        Column::numeric(columns::LONGITUDE, longitudes),
        Column::text(columns::TIMESTAMP, timestamps),
        Column::numeric(columns::PRECIPITATION, precipitation),
        Column::numeric(columns::SLOPE, slope),
        Column::text(columns::LANDSLIDE_TYPE, kinds),
        Column::text(columns::SOIL_TYPE, soils),
        Column::text(columns::VEGETATION_COVER, covers),
        Column::numeric(columns::VOLUME, volumes),
    ];
    Frame::new(table).expect("synthetic columns have equal lengths and distinct names")
}

/// [`synthetic_landslides`] rendered as CSV text.
pub fn synthetic_landslides_csv(rows: usize, seed: u64, noise: f64) -> String {
    let mut out = Vec::new();
    synthetic_landslides(rows, seed, noise)
        .write_csv(&mut out)
        .expect("writing to memory cannot fail");
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_seed() {
        assert_eq!(synthetic_landslides(20, 3, 5.0), synthetic_landslides(20, 3, 5.0));
        assert_ne!(synthetic_landslides(20, 3, 5.0), synthetic_landslides(20, 4, 5.0));
    }

    #[test]
    fn has_raw_schema() {
        let frame = synthetic_landslides(5, 1, 0.0);
        assert_eq!(frame.n_rows(), 5);
        assert_eq!(frame.n_columns(), 10);
        assert!(frame.column(columns::TIMESTAMP).is_some_and(|c| !c.is_numeric()));
        assert!(frame.column(columns::VOLUME).is_some_and(Column::is_numeric));
    }

    #[test]
    fn csv_reads_back() {
        let csv = synthetic_landslides_csv(8, 2, 1.0);
        let frame = Frame::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(frame.n_rows(), 8);
        assert!(frame.column(columns::SOIL_TYPE).unwrap().text_at(0).is_some());
    }
}
