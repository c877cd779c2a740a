// Engine-level checks: the four kernel variants agree where the band does
// not bind, the gap models price runs differently, and the fill edges hold.

mod common;

use banded_align::engine::{band_fill, AffineGap, LinearGap};
use banded_align::section::encode_seq;
use banded_align::{
    dp_fill_root, dp_init, dp_trace, init, AlignParams, ScoringProfile, Section,
};
use common::LIM;

#[test]
fn all_variants_agree_on_the_reference_pair() {
    let a = encode_seq("GGAAAAAAAA");
    let b = encode_seq("AAAAAAAA");

    let linear = ScoringProfile::new(&AlignParams::simple(1, 1, 0, 1));
    assert_eq!(band_fill::<LinearGap, 16>(&linear, &a, &b).max, 6);
    assert_eq!(band_fill::<LinearGap, 32>(&linear, &a, &b).max, 6);

    let affine = ScoringProfile::new(&AlignParams::simple(1, 1, 1, 1));
    assert_eq!(band_fill::<AffineGap, 16>(&affine, &a, &b).max, 5);
    assert_eq!(band_fill::<AffineGap, 32>(&affine, &a, &b).max, 5);
}

#[test]
fn identity_scores_every_base() {
    let prof = ScoringProfile::new(&AlignParams::simple(1, 1, 0, 1));
    let s = encode_seq("ACGT");
    let ext = band_fill::<LinearGap, 32>(&prof, &s, &s);
    assert_eq!(ext.max, 4);
    assert_eq!((ext.max_a, ext.max_b), (4, 4));
    assert!(!ext.terminated);
}

#[test]
fn substitution_costs_through_the_matrix() {
    let prof = ScoringProfile::new(&AlignParams::simple(1, 1, 0, 1));
    let a = encode_seq("ACGT");
    let b = encode_seq("AGGT");
    assert_eq!(band_fill::<LinearGap, 32>(&prof, &a, &b).max, 2);
}

#[test]
fn gap_models_price_runs_differently() {
    // a two-base gap through the GG island: 8 matched bases minus the run
    let a = encode_seq("AAGGAA");
    let b = encode_seq("AAAA");

    let linear = ScoringProfile::new(&AlignParams::simple(2, 3, 0, 1));
    assert_eq!(band_fill::<LinearGap, 32>(&linear, &a, &b).max, 6);

    let affine = ScoringProfile::new(&AlignParams::simple(2, 3, 1, 1));
    assert_eq!(band_fill::<AffineGap, 32>(&affine, &a, &b).max, 5);
}

#[test]
fn empty_sides_hold_the_anchor_score() {
    let prof = ScoringProfile::new(&AlignParams::simple(1, 1, 0, 1));
    let s = encode_seq("ACGT");
    let empty: Vec<u8> = Vec::new();
    assert_eq!(band_fill::<LinearGap, 32>(&prof, &empty, &s).max, 0);
    assert_eq!(band_fill::<LinearGap, 32>(&prof, &s, &empty).max, 0);
    assert_eq!(band_fill::<LinearGap, 32>(&prof, &empty, &empty).max, 0);
}

#[test]
fn narrow_band_clamps_the_reachable_cells() {
    // the best cell sits 20 off the diagonal; only the wide band covers the
    // cheap-gap route, and the narrow band must not exceed the wide score
    let a = encode_seq(&format!("{}{}", "G".repeat(20), "A".repeat(8)));
    let b = encode_seq("AAAAAAAA");
    let prof = ScoringProfile::new(&AlignParams::simple(5, 1, 0, 1));
    let narrow = band_fill::<LinearGap, 16>(&prof, &a, &b).max;
    let wide = band_fill::<LinearGap, 32>(&prof, &a, &b).max;
    assert_eq!(wide, 20, "8 matches at 5 minus a 20-base gap");
    assert!(narrow <= wide);
}

#[test]
fn root_anchor_offsets_apply() {
    // anchoring past the GG prefix removes the gap entirely
    let a = encode_seq("GGAAAAAAAA");
    let b = encode_seq("AAAAAAAA");
    let ctx = init(Some(&AlignParams::simple(1, 1, 0, 1))).unwrap();
    let mut dp = dp_init(&ctx, LIM, LIM).unwrap();
    let f = dp_fill_root(&mut dp, &Section::build(0, &a), 2, &Section::build(4, &b), 0).unwrap();
    assert_eq!(f.max, 8);
}

#[test]
fn out_of_range_anchor_is_absent() {
    let a = encode_seq("ACGT");
    let b = encode_seq("ACGT");
    let ctx = init(Some(&AlignParams::simple(1, 1, 0, 1))).unwrap();
    let mut dp = dp_init(&ctx, LIM, LIM).unwrap();
    assert!(dp_fill_root(&mut dp, &Section::build(0, &a), 5, &Section::build(4, &b), 0).is_none());
}

#[test]
fn degenerate_gap_costs_fail_construction() {
    let mut params = AlignParams::simple(1, 1, 0, 1);
    params.gap_extend = 0;
    assert!(init(Some(&params)).is_none());
}

#[test]
fn empty_fill_traces_to_an_empty_alignment() {
    let a: Vec<u8> = Vec::new();
    let b: Vec<u8> = Vec::new();
    let ctx = init(Some(&AlignParams::simple(1, 1, 0, 1))).unwrap();
    let mut dp = dp_init(&ctx, LIM, LIM).unwrap();
    let f = dp_fill_root(&mut dp, &Section::build(0, &a), 0, &Section::build(4, &b), 0).unwrap();
    assert_eq!(f.max, 0);
    let r = dp_trace(&mut dp, Some(f), None, None).unwrap();
    assert_eq!(r.path_len, 0);
    assert!(r.segments.is_empty());
}

#[test]
fn wide_root_retains_the_chained_narrow_root() {
    use banded_align::engine::context as ectx;
    let p = AlignParams::simple(1, 1, 0, 1);
    let narrow = ectx::init::<LinearGap, 16>(&p, None).unwrap();
    let mut wide = ectx::init::<LinearGap, 32>(&p, Some(Box::new(narrow))).unwrap();
    assert!(wide.has_chained());
    assert_eq!(wide.bandwidth(), 32);
    // releasing the wide root releases the chain with it
    ectx::clean(&mut wide);
    assert!(!wide.has_chained());
}

#[test]
fn affine_traceback_prices_one_open_per_run() {
    // the traced alignment's tallies must reflect a single two-base run
    let a = encode_seq("AAGGAA");
    let b = encode_seq("AAAA");
    let ctx = init(Some(&AlignParams::simple(2, 3, 1, 1))).unwrap();
    let mut dp = dp_init(&ctx, LIM, LIM).unwrap();
    let f = dp_fill_root(&mut dp, &Section::build(0, &a), 0, &Section::build(4, &b), 0).unwrap();
    assert_eq!(f.max, 5);
    let r = dp_trace(&mut dp, Some(f), None, None).unwrap();
    assert_eq!(r.score, 5);
    assert_eq!(r.gap_opens, 1);
    assert_eq!(r.gap_bases, 2);
}
