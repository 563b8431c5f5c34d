use manhattan_core::{
    project_hits, ChromosomeLayout, DisplayHit, HitIndex, HitIndexParams, PValueScale, PlotScales,
    ReferenceTable, SignificantHit,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VIEW_WIDTH: f64 = 1000.0;
const VIEW_HEIGHT: f64 = 600.0;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn two_chromosome_layout() -> ChromosomeLayout {
    let table = ReferenceTable::new(
        "toy",
        vec![("1".to_string(), 100), ("2".to_string(), 50)],
        4.0,
        3000.0,
    );
    ChromosomeLayout::new(&table).expect("valid toy table")
}

/// Linear scan with the same distance and tie rules as the grid
fn brute_force_nearest<'a>(
    hits: &'a [DisplayHit],
    x: f64,
    y: f64,
    radius: f64,
) -> Option<&'a DisplayHit> {
    let mut best: Option<(f64, usize)> = None;
    for (i, hit) in hits.iter().enumerate() {
        let (px, py) = hit.pixel(VIEW_WIDTH, VIEW_HEIGHT);
        let dist_sq = (px - x) * (px - x) + (py - y) * (py - y);
        if dist_sq >= radius * radius {
            continue;
        }
        if best.map_or(true, |(best_sq, _)| dist_sq < best_sq) {
            best = Some((dist_sq, i));
        }
    }
    best.map(|(_, i)| &hits[i])
}

fn random_hits(rng: &mut StdRng, count: usize) -> Vec<DisplayHit> {
    (0..count)
        .map(|i| DisplayHit {
            hit: SignificantHit::new("1", i as i64, 1e-9).with_id(format!("hit-{}", i)),
            x_normalized: rng.gen_range(0.0..1.0),
            y_normalized: rng.gen_range(0.0..1.0),
        })
        .collect()
}

#[test]
fn chromosome_layout_concrete_example() {
    let layout = two_chromosome_layout();
    let chrom1 = layout.span("1").expect("chromosome 1");

    assert!(approx_eq(layout.get_x("1", 0).unwrap(), 0.0 / 3000.0));
    assert!(approx_eq(layout.get_x("1", 100).unwrap(), chrom1.end_normalized));
    assert!(approx_eq(
        layout.get_x("2", 0).unwrap(),
        chrom1.end_normalized + 4.0 / 3000.0
    ));
    assert!(approx_eq(layout.get_x("chr2", 0).unwrap(), layout.get_x("2", 0).unwrap()));
    assert!(approx_eq(layout.chromosomes()[1].end_normalized, 1.0));
}

#[test]
fn pvalue_scale_concrete_example() {
    let scale = PValueScale::new(10.0, 0.6, 300.0).unwrap();
    assert_eq!(scale.get_y(1.0), 1.0);
    assert!(approx_eq(scale.get_y_from_neg_log_p(10.0), 0.4));
    assert!(approx_eq(scale.get_y_from_neg_log_p(300.0), 0.0));
    assert!(approx_eq(scale.get_y(1e-10), 0.4));
}

#[test]
fn empty_hit_index_finds_nothing() {
    let index = HitIndex::build(&[], 800.0, 600.0);
    assert!(index.find_nearest(400.0, 300.0).is_none());
}

#[test]
fn hit_index_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    let radius = HitIndexParams::default().hit_radius_px;
    let mut found = 0usize;

    for trial in 0..1000 {
        let count = rng.gen_range(0..400);
        let hits = random_hits(&mut rng, count);
        let index = HitIndex::build(&hits, VIEW_WIDTH, VIEW_HEIGHT);

        for _ in 0..5 {
            // half the queries land near an existing hit so matches are common
            let (x, y) = if !hits.is_empty() && rng.gen_bool(0.5) {
                let target = &hits[rng.gen_range(0..hits.len())];
                let (px, py) = target.pixel(VIEW_WIDTH, VIEW_HEIGHT);
                (px + rng.gen_range(-15.0..15.0), py + rng.gen_range(-15.0..15.0))
            } else {
                (rng.gen_range(-20.0..VIEW_WIDTH + 20.0), rng.gen_range(-20.0..VIEW_HEIGHT + 20.0))
            };

            let expected = brute_force_nearest(&hits, x, y, radius);
            let actual = index.find_nearest(x, y);
            match (expected, actual) {
                (None, None) => {}
                (Some(e), Some(a)) => {
                    assert!(
                        std::ptr::eq(e, a),
                        "trial {}: query ({}, {}) expected {} got {}",
                        trial,
                        x,
                        y,
                        e.hit.id,
                        a.hit.id
                    );
                    found += 1;
                }
                (e, a) => panic!(
                    "trial {}: query ({}, {}) expected {:?} got {:?}",
                    trial,
                    x,
                    y,
                    e.map(|h| &h.hit.id),
                    a.map(|h| &h.hit.id)
                ),
            }
        }
    }

    assert!(found > 500, "too few positive queries: {}", found);
}

proptest! {
    #[test]
    fn pvalue_scale_is_monotonic(a in 1e-300f64..=1.0, b in 1e-300f64..=1.0) {
        let scale = PValueScale::default();
        let (p1, p2) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(scale.get_y(p1) <= scale.get_y(p2));
    }

    #[test]
    fn neg_log_p_scale_is_monotonic(a in 0.0f64..500.0, b in 0.0f64..500.0) {
        let scale = PValueScale::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (y_lo, y_hi) = (scale.get_y_from_neg_log_p(lo), scale.get_y_from_neg_log_p(hi));
        prop_assert!(y_hi <= y_lo);
        prop_assert!((0.0..=1.0).contains(&y_hi));
    }

    #[test]
    fn chromosome_spans_are_ordered(
        lengths in prop::collection::vec(1u64..1_000_000_000, 1..30),
        gap in 0.0f64..10.0,
    ) {
        let table = ReferenceTable::new(
            "random",
            lengths.iter().enumerate().map(|(i, &len)| ((i + 1).to_string(), len)),
            gap,
            3000.0,
        );
        let layout = ChromosomeLayout::new(&table).unwrap();
        let spans = layout.chromosomes();
        for span in spans {
            prop_assert!(span.start_normalized >= 0.0 && span.start_normalized <= 1.0);
            prop_assert!(span.end_normalized >= 0.0 && span.end_normalized <= 1.0);
            prop_assert!(span.start_normalized <= span.end_normalized);
        }
        for pair in spans.windows(2) {
            prop_assert!(pair[0].end_normalized <= pair[1].start_normalized);
        }
    }

    #[test]
    fn projection_is_idempotent(
        records in prop::collection::vec((1u8..=24, 0i64..200_000_000, 1e-50f64..=1.0), 0..50),
    ) {
        let hits: Vec<SignificantHit> = records
            .iter()
            .map(|&(chrom, position, pvalue)| {
                // 24 stands in for a contig missing from the reference
                let contig = match chrom {
                    23 => "X".to_string(),
                    24 => "chrUn".to_string(),
                    n => format!("chr{}", n),
                };
                SignificantHit::new(contig, position, pvalue)
            })
            .collect();
        let scales = PlotScales::grch38();
        let first = project_hits(&hits, &scales);
        let second = project_hits(&hits, &scales);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.len() <= hits.len());
        for d in &first {
            prop_assert!((0.0..=1.0).contains(&d.x_normalized));
        }
    }
}
