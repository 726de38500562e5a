#![allow(clippy::float_cmp)]

use super::*;

fn ids(options: &[&GridOption]) -> Vec<&'static str> {
    options.iter().map(|o| o.id).collect()
}

// --- catalog ---

#[test]
fn catalog_ids_are_unique() {
    for (i, a) in ALL_GRID_OPTIONS.iter().enumerate() {
        for b in &ALL_GRID_OPTIONS[i + 1..] {
            assert_ne!(a.id, b.id);
        }
    }
}

#[test]
fn square_layouts_match_cols_over_rows() {
    for option in ALL_GRID_OPTIONS.iter().filter(|o| !o.is_panorama()) {
        assert_eq!(option.target_ratio, f64::from(option.cols) / f64::from(option.rows));
    }
}

#[test]
fn panorama_layouts_use_portrait_tiles() {
    let pano = find_option("3x3-pano").expect("3x3-pano");
    assert!(pano.is_panorama());
    assert_eq!(pano.target_ratio, 0.8);
    assert_eq!(pano.tile_count(), 9);
}

#[test]
fn from_str_parses_known_id() {
    let option: GridOption = "3x2-pano".parse().expect("known id");
    assert_eq!(option.cols, 3);
    assert_eq!(option.rows, 2);
    assert_eq!(option.target_ratio, 1.2);
}

#[test]
fn from_str_rejects_unknown_id() {
    let err = "4x4".parse::<GridOption>().expect_err("unknown id");
    assert!(matches!(err, TilesError::UnknownGrid(ref id) if id == "4x4"));
}

#[test]
fn option_serializes_for_hosts() {
    let json = serde_json::to_value(ALL_GRID_OPTIONS[2]).expect("serialize");
    assert_eq!(json["id"], "3x3");
    assert_eq!(json["cols"], 3);
    assert_eq!(json["target_ratio"], 1.0);
}

// --- best_option ---

#[test]
fn best_option_square_photo_is_3x3() {
    assert_eq!(best_option(1.0).id, "3x3");
}

#[test]
fn best_option_wide_panorama_is_3x1() {
    assert_eq!(best_option(16.0 / 5.0).id, "3x1");
}

#[test]
fn best_option_landscape_photo_is_3x2() {
    assert_eq!(best_option(3.0 / 2.0).id, "3x2");
}

#[test]
fn best_option_portrait_phone_photo_is_3x4() {
    assert_eq!(best_option(9.0 / 16.0).id, "3x4");
}

#[test]
fn best_option_four_by_five_is_pano() {
    assert_eq!(best_option(0.8).id, "3x3-pano");
}

#[test]
fn best_option_tie_goes_to_earlier_entry() {
    // 2.25 sits exactly between 3x2 (1.5) and 3x1 (3.0).
    assert_eq!(best_option(2.25).id, "3x1");
}

#[test]
fn best_option_nan_falls_back_to_first() {
    assert_eq!(best_option(f64::NAN).id, "3x1");
}

// --- ranked_options ---

#[test]
fn ranked_options_limits_to_four() {
    assert_eq!(ranked_options(1.0).len(), RANKED_OPTION_LIMIT);
}

#[test]
fn ranked_options_orders_by_distance() {
    assert_eq!(ids(&ranked_options(0.95)), vec!["3x3", "3x3-pano", "3x4", "3x2-pano"]);
}

#[test]
fn ranked_options_first_matches_best_option() {
    for ratio in [0.5, 0.8, 1.1, 1.4, 2.0, 4.0] {
        assert_eq!(ranked_options(ratio)[0].id, best_option(ratio).id);
    }
}

#[test]
fn ranked_options_nan_keeps_catalog_order() {
    assert_eq!(ids(&ranked_options(f64::NAN)), vec!["3x1", "3x2", "3x3", "3x4"]);
}
