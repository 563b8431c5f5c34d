//! Deterministic removal of overlaps left by the relaxation
//!
//! Two labels overlap when their centers are closer than
//! `overlap_tolerance * (radius_a + radius_b)`. Only `y` is changed here, so
//! the horizontal order produced by the relaxation is kept.

use super::{LabelLayoutParams, PeakLabelNode};

/// Clearance added on top of the exact separation
const EPSILON: f64 = 1e-6;

/// Index pairs `(i, j)`, `i < j`, of nodes that overlap
pub fn overlapping_pairs(nodes: &[PeakLabelNode], tolerance: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if overlaps(&nodes[i], &nodes[j], tolerance) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn overlaps(a: &PeakLabelNode, b: &PeakLabelNode, tolerance: f64) -> bool {
    let min_dist = tolerance * (a.radius + b.radius);
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy < min_dist * min_dist
}

/// Sweep nodes left to right, lifting the lower label of every overlapping
/// pair above the other one
///
/// Returns the number of passes run. If the pass budget runs out with
/// overlaps left, the remaining nodes are settled bottom-up so the result is
/// always overlap-free.
pub fn resolve_overlaps(nodes: &mut [PeakLabelNode], params: &LabelLayoutParams) -> usize {
    if nodes.len() < 2 {
        return 0;
    }

    let tolerance = params.overlap_tolerance;
    let max_radius = nodes.iter().map(|n| n.radius).fold(0.0, f64::max);

    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| nodes[a].x.total_cmp(&nodes[b].x).then(a.cmp(&b)));

    for pass in 0..params.resolve_passes {
        let mut found = 0usize;
        for a in 0..order.len() {
            let i = order[a];
            let reach = tolerance * (nodes[i].radius + max_radius);
            for &j in &order[a + 1..] {
                if nodes[j].x - nodes[i].x >= reach {
                    break;
                }
                if overlaps(&nodes[i], &nodes[j], tolerance) {
                    found += 1;
                    stack_lower_above(nodes, i, j, params);
                }
            }
        }

        log::trace!("resolve pass {}: {} overlaps", pass, found);
        if found == 0 {
            return pass + 1;
        }
    }

    let remaining = overlapping_pairs(nodes, tolerance).len();
    if remaining > 0 {
        log::warn!(
            "{} label overlaps left after {} resolve passes, settling bottom-up",
            remaining,
            params.resolve_passes
        );
        settle(nodes, params);
    }
    params.resolve_passes
}

/// Vertical lift that clears `other` given the horizontal offset between
/// the two nodes
fn clearance(node: &PeakLabelNode, other: &PeakLabelNode, params: &LabelLayoutParams) -> f64 {
    let min_dist = params.overlap_tolerance * (node.radius + other.radius);
    let dx = node.x - other.x;
    let needed = (min_dist * min_dist - dx * dx).max(0.0).sqrt() + EPSILON;
    needed.max(params.label_height_px + params.label_spacing_px)
}

/// Move whichever of `i`, `j` sits lower (larger y) above the other one
///
/// On equal y the node further right (`j` in sweep order) moves.
fn stack_lower_above(nodes: &mut [PeakLabelNode], i: usize, j: usize, params: &LabelLayoutParams) {
    let (lower, higher) = if nodes[i].y > nodes[j].y { (i, j) } else { (j, i) };
    let lift = clearance(&nodes[lower], &nodes[higher], params);
    nodes[lower].y = nodes[higher].y - lift;
}

/// Place nodes bottom-up, lifting each one above any already placed node
/// it overlaps
///
/// A node lifted above a placed node never collides with it again, so every
/// node needs at most one lift per placed node.
fn settle(nodes: &mut [PeakLabelNode], params: &LabelLayoutParams) {
    let tolerance = params.overlap_tolerance;
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| {
        nodes[b]
            .y
            .total_cmp(&nodes[a].y)
            .then(nodes[a].x.total_cmp(&nodes[b].x))
            .then(a.cmp(&b))
    });

    let mut placed: Vec<usize> = Vec::with_capacity(nodes.len());
    for &idx in &order {
        for _ in 0..=placed.len() {
            let conflict = placed
                .iter()
                .copied()
                .find(|&other| overlaps(&nodes[idx], &nodes[other], tolerance));
            match conflict {
                Some(other) => {
                    let lift = clearance(&nodes[idx], &nodes[other], params);
                    nodes[idx].y = nodes[idx].y.min(nodes[other].y - lift);
                }
                None => break,
            }
        }
        placed.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f64, y: f64, radius: f64) -> PeakLabelNode {
        PeakLabelNode {
            contig: "1".to_string(),
            position: 0,
            pvalue: 1e-10,
            target_x: x,
            target_y: 0.0,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            label: "G".to_string(),
            width: 20.0,
            height: 12.0,
            radius,
            has_burden: false,
            burden_types: Vec::new(),
            gene_count: 1,
        }
    }

    #[test]
    fn test_overlapping_pairs() {
        let nodes = vec![node(0.0, 0.0, 10.0), node(5.0, 0.0, 10.0), node(100.0, 0.0, 10.0)];
        assert_eq!(overlapping_pairs(&nodes, 0.7), vec![(0, 1)]);
    }

    #[test]
    fn test_stack_moves_lower_node_up() {
        let params = LabelLayoutParams::default();
        let mut nodes = vec![node(0.0, 0.0, 10.0), node(2.0, 3.0, 10.0)];
        let passes = resolve_overlaps(&mut nodes, &params);
        assert!(passes >= 1);
        assert_eq!(nodes[0].y, 0.0);
        assert!(nodes[1].y < 0.0);
        assert!(nodes[0].y - nodes[1].y >= params.label_height_px + params.label_spacing_px);
        assert!(overlapping_pairs(&nodes, params.overlap_tolerance).is_empty());
        assert_eq!(nodes[1].x, 2.0);
    }

    #[test]
    fn test_no_overlap_is_single_pass() {
        let params = LabelLayoutParams::default();
        let mut nodes = vec![node(0.0, 0.0, 10.0), node(50.0, 0.0, 10.0)];
        assert_eq!(resolve_overlaps(&mut nodes, &params), 1);
        assert_eq!(nodes[1].y, 0.0);
    }

    #[test]
    fn test_dense_pile_is_overlap_free_with_tiny_budget() {
        let params = LabelLayoutParams {
            resolve_passes: 1,
            ..Default::default()
        };
        let mut nodes: Vec<PeakLabelNode> = (0..25).map(|i| node(i as f64 * 0.5, 0.0, 25.0)).collect();
        resolve_overlaps(&mut nodes, &params);
        assert!(overlapping_pairs(&nodes, params.overlap_tolerance).is_empty());
    }
}
