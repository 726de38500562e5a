use super::*;

use tiles::color::PRESET_PAD_COLORS;
use tiles::options::find_option;

#[test]
fn option_card_has_one_cell_per_tile() {
    let option = find_option("3x4").unwrap();
    let html = option_card_html(option, false);
    assert_eq!(html.matches("grid-cell").count(), 12);
    assert!(html.contains("data-grid=\"3x4\""));
    assert!(!html.contains("option-card active"));
}

#[test]
fn active_option_card_is_marked() {
    let option = find_option("3x3").unwrap();
    assert!(option_card_html(option, true).contains("option-card active"));
}

#[test]
fn panorama_card_gets_pano_preview() {
    let option = find_option("3x2-pano").unwrap();
    let html = option_card_html(option, false);
    assert!(html.contains("grid-preview pano"));
    assert!(html.contains("3x2 (4:5 panorama)"));
}

#[test]
fn preset_swatches_parse_back_to_their_colors() {
    for color in PRESET_PAD_COLORS {
        let html = color_dot_html(color);
        let start = html.find("data-color=\"").expect("data-color") + "data-color=\"".len();
        let end = start + html[start..].find('"').expect("closing quote");
        assert_eq!(html[start..end].parse::<PadColor>().expect("parse"), color);
    }
}

#[test]
fn fixed_swatch_paints_its_color() {
    let html = color_dot_html(PadColor::Rgb([255, 255, 255]));
    assert!(html.contains("background: #ffffff"));
}
