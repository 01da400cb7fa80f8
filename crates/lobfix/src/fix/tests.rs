use super::*;
use crate::geodesy::{distance, shift};
use crate::geom2::{cross, signed_area};
use crate::scenario::{draw_scenario, ReplayToken, ScenarioCfg};
use nalgebra::Vector2;

const EMITTER: Coordinate = Coordinate::new(33.80, 42.44);

/// Sensor placed `range_m` from the emitter on bearing `from_deg`, aimed back at it.
fn aimed_reading(from_deg: f64, range_m: f64) -> SensorReading {
    let position = shift(EMITTER, from_deg, range_m).unwrap();
    let back = (from_deg + 180.0) % 360.0;
    SensorReading::new(position, back, 5.0, 500.0, 3000.0).unwrap()
}

fn lob(r: &SensorReading) -> LobPolygon {
    LobPolygon::build(r, &LobCfg::default()).unwrap()
}

/// Two sensors 2000 m apart on an east-west baseline, both aimed at the emitter.
fn crossing_pair() -> (LobPolygon, LobPolygon) {
    let d = 1000.0 * std::f64::consts::SQRT_2;
    (lob(&aimed_reading(225.0, d)), lob(&aimed_reading(135.0, d)))
}

#[test]
fn two_crossing_bearings_cut_near_the_emitter() {
    let (a, b) = crossing_pair();
    assert!((distance(a.reading.position, b.reading.position) - 2000.0).abs() < 1.0);

    let cut = solve_cut(&a, &b, &SolverCfg::default()).unwrap();
    assert!(!cut.is_empty());
    let c = cut.centroid().unwrap();
    assert!(distance(c, EMITTER) < 100.0, "centroid {c:?}");

    assert!(cut.bearings_cross);
    let x = cut.bearing_intersection.expect("center lines cross");
    assert!(distance(x, EMITTER) < 5.0);

    let acc = cut.accuracy_improvement.expect("non-empty cut is rated");
    assert!(acc.is_finite() && (0.0..1.0).contains(&acc), "accuracy {acc}");
    assert!(cut.area_acres > 0.0 && cut.area_acres < a.area_acres.min(b.area_acres));
}

#[test]
fn identical_bearings_give_no_improvement() {
    let (a, _) = crossing_pair();
    let cut = solve_cut(&a, &a, &SolverCfg::default()).unwrap();
    assert_eq!(cut.vertices.len(), 4);
    assert!((cut.area_acres - a.area_acres).abs() < 1e-6 * a.area_acres);
    let acc = cut.accuracy_improvement.unwrap();
    assert!(acc.abs() < 1e-6, "accuracy {acc}");
    // collinear center lines never properly cross
    assert!(!cut.bearings_cross);
}

#[test]
fn diverging_bearings_give_empty_cut() {
    let (a, _) = crossing_pair();
    let away = SensorReading {
        azimuth_deg: 135.0,
        ..aimed_reading(135.0, 1000.0 * std::f64::consts::SQRT_2)
    };
    let b = lob(&away);
    let cut = solve_cut(&a, &b, &SolverCfg::default()).unwrap();
    assert!(cut.is_empty());
    assert!(cut.ring.is_empty());
    assert_eq!(cut.area_acres, 0.0);
    assert!(cut.accuracy_improvement.is_none());
    assert!(cut.centroid().is_none());
}

#[test]
fn bearing_gate_skips_polygon_work() {
    let (a, _) = crossing_pair();
    let gated = SolverCfg {
        skip_if_bearings_miss: true,
        ..SolverCfg::default()
    };
    assert!(solve_cut(&a, &a, &gated).unwrap().is_empty());
    assert!(!solve_cut(&a, &a, &SolverCfg::default()).unwrap().is_empty());
}

fn crossing_trio() -> [LobPolygon; 3] {
    let (a, b) = crossing_pair();
    [a, b, lob(&aimed_reading(0.0, 1500.0))]
}

#[test]
fn three_bearings_fix_near_the_emitter() {
    let trio = crossing_trio();
    let fix = solve_fix(&trio, &SolverCfg::default()).unwrap();
    assert!(!fix.is_empty());
    assert_eq!(fix.composition, FixComposition::ReferenceFirst);
    let c = fix.centroid().unwrap();
    assert!(distance(c, EMITTER) < 100.0, "centroid {c:?}");
    assert!(fix.area_acres <= fix.cuts[0].area_acres + 1e-9);
    assert!(fix.area_acres <= fix.cuts[1].area_acres + 1e-9);
    let acc = fix.accuracy_improvement.unwrap();
    assert!(acc.is_finite() && acc > 0.0, "accuracy {acc}");
}

#[test]
fn all_pairs_never_grows_the_fix() {
    let trio = crossing_trio();
    let reference = solve_fix(&trio, &SolverCfg::default()).unwrap();
    let all = solve_fix(
        &trio,
        &SolverCfg {
            composition: FixComposition::AllPairs,
            ..SolverCfg::default()
        },
    )
    .unwrap();
    assert!(!all.is_empty());
    assert!(all.area_acres <= reference.area_acres + 1e-9);
}

#[test]
fn fix_is_empty_when_a_reference_cut_is_empty() {
    let [a, b, _] = crossing_trio();
    let far_away = lob(&SensorReading::new(Coordinate::new(34.5, 43.5), 90.0, 5.0, 500.0, 3000.0).unwrap());
    let fix = solve_fix(&[a, b, far_away], &SolverCfg::default()).unwrap();
    assert!(fix.cuts[1].is_empty());
    assert!(fix.is_empty());
    assert!(fix.accuracy_improvement.is_none());
}

#[test]
fn raw_vertex_sets_follow_reference_composition() {
    let cfg = GeomCfg::default();
    let sq = |x0: f64, y0: f64| {
        vec![
            Coordinate::new(x0, y0),
            Coordinate::new(x0 + 2.0, y0),
            Coordinate::new(x0 + 2.0, y0 + 2.0),
            Coordinate::new(x0, y0 + 2.0),
        ]
    };
    let (p1, p2, p3) = (sq(0.0, 0.0), sq(1.0, 0.0), sq(0.0, 1.0));
    let fix = fix_vertices([&p1, &p2, &p3], FixComposition::ReferenceFirst, &cfg);
    let (ring, area) = ring_area(&fix, &cfg);
    assert_eq!(ring.len(), 4);
    assert!((area - crate::geom2::area_acres(&sq(1.0, 1.0)[..]) / 4.0).abs() < 1e-6 * area);
    // p2 and p3 alone are never intersected under the reference composition
    let disjoint = sq(10.0, 10.0);
    assert!(fix_vertices([&p1, &p2, &disjoint], FixComposition::ReferenceFirst, &cfg).is_empty());
    assert!(intersect_vertex_sets(&[], &p1, &cfg).is_empty());
}

#[test]
fn solve_dispatches_on_reading_count() {
    let cfg = SolverCfg::default();
    let d = 1000.0 * std::f64::consts::SQRT_2;
    let r1 = aimed_reading(225.0, d);
    let r2 = aimed_reading(135.0, d);
    let r3 = aimed_reading(0.0, 1500.0);

    assert!(matches!(solve(&[r1], &cfg).unwrap(), Solution::Lob { .. }));
    match solve(&[r1, r2], &cfg).unwrap() {
        Solution::Cut { lobs, cut } => {
            assert_eq!(lobs.len(), 2);
            assert!(!cut.is_empty());
        }
        other => panic!("expected cut, got {other:?}"),
    }
    assert!(matches!(
        solve(&[r1, r2, r3], &cfg).unwrap(),
        Solution::Fix { .. }
    ));
    assert!(matches!(solve(&[], &cfg), Err(LobError::InvalidArgument(_))));
    assert!(matches!(
        solve(&[r1, r2, r3, r1], &cfg),
        Err(LobError::InvalidArgument(_))
    ));
}

/// Counterclockwise planar ring of a LOB.
fn ccw_ring(lob: &LobPolygon) -> Vec<Vector2<f64>> {
    let mut ring: Vec<_> = lob.ring.iter().map(|c| c.to_vec2()).collect();
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    ring
}

/// Sutherland-Hodgman clip of `subject` by the convex counterclockwise `clipper`.
fn clip(subject: &[Vector2<f64>], clipper: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let mut out = subject.to_vec();
    for i in 0..clipper.len() {
        let (a, b) = (clipper[i], clipper[(i + 1) % clipper.len()]);
        let input = std::mem::take(&mut out);
        for j in 0..input.len() {
            let (p, q) = (input[j], input[(j + 1) % input.len()]);
            let (sp, sq) = (cross(a, b, p), cross(a, b, q));
            if sp >= 0.0 {
                out.push(p);
            }
            if (sp >= 0.0) != (sq >= 0.0) {
                out.push(p + (q - p) * (sp / (sp - sq)));
            }
        }
    }
    out
}

fn clipped_area(lobs: &[LobPolygon]) -> f64 {
    let (first, rest) = lobs.split_first().unwrap();
    let clipped = rest
        .iter()
        .fold(ccw_ring(first), |acc, l| clip(&acc, &ccw_ring(l)));
    if clipped.len() < 3 {
        return 0.0;
    }
    let coords: Vec<_> = clipped.into_iter().map(Coordinate::from_vec2).collect();
    crate::geom2::area_acres(&coords)
}

#[test]
fn noisy_fixes_match_a_direct_clip_of_all_three_lobs() {
    let scenario = ScenarioCfg {
        bearing_noise_deg: 4.0,
        emitter_spread_m: 3000.0,
        ..ScenarioCfg::default()
    };
    for composition in [FixComposition::ReferenceFirst, FixComposition::AllPairs] {
        let cfg = SolverCfg {
            composition,
            ..SolverCfg::default()
        };
        for index in 0..200 {
            let s = draw_scenario(&scenario, ReplayToken { seed: 77, index }).unwrap();
            let lobs: Vec<_> = s.readings.iter().map(lob).collect();
            let trio = [lobs[0].clone(), lobs[1].clone(), lobs[2].clone()];
            let fix = solve_fix(&trio, &cfg).unwrap();

            let truth = clipped_area(&lobs);
            assert!(
                (fix.area_acres - truth).abs() <= 1e-3 * truth + 1e-6,
                "{composition:?} index {index}: fix {} acres, clip {truth} acres",
                fix.area_acres
            );
            let cut = clipped_area(&lobs[..2]);
            assert!((fix.cuts[0].area_acres - cut).abs() <= 1e-3 * cut + 1e-6);

            for (i, a) in fix.vertices.iter().enumerate() {
                for b in &fix.vertices[i + 1..] {
                    let gap = (a.to_vec2() - b.to_vec2()).norm();
                    assert!(gap > cfg.geom.eps_merge, "index {index}: near-twin vertices {a:?} {b:?}");
                }
            }
        }
    }
}

#[test]
fn near_twin_vertices_do_not_fold_the_ring() {
    let cfg = GeomCfg::default();
    let square = [
        Coordinate::new(33.80, 42.39),
        Coordinate::new(33.81, 42.39),
        Coordinate::new(33.81, 42.40),
        Coordinate::new(33.80, 42.40),
    ];
    let (_, clean) = ring_area(&square, &cfg);
    // twin of the max-longitude corner, 1.3e-10° away
    let mut twinned = square.to_vec();
    twinned.push(Coordinate::new(33.81 - 1e-10, 42.40 - 8e-11));
    let (ring, area) = ring_area(&twinned, &cfg);
    assert_eq!(ring.len(), 4);
    assert!((area - clean).abs() < 1e-9 * clean, "{area} vs {clean}");

    let merged = intersect_vertex_sets(&twinned, &square, &cfg);
    assert_eq!(merged.len(), 4);
}
