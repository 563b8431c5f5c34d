//! Bounded force relaxation of label nodes
//!
//! Each tick accumulates velocity from three rules and then integrates:
//! an x pull toward the peak, a weak y pull toward the baseline, and a
//! pairwise collision push between overlapping circles. The loop always runs
//! the configured number of ticks; there is no convergence check.

use super::{LabelLayoutParams, PeakLabelNode};

const ALPHA_MIN: f64 = 0.001;
/// Cooling over the first 300 ticks, after which alpha is near `ALPHA_MIN`
const ALPHA_DECAY_TICKS: f64 = 300.0;
const VELOCITY_DECAY: f64 = 0.4;
const JIGGLE: f64 = 1e-6;

/// Run the simulation in place
pub fn relax(nodes: &mut [PeakLabelNode], params: &LabelLayoutParams) {
    if nodes.is_empty() {
        return;
    }

    let alpha_decay = 1.0 - ALPHA_MIN.powf(1.0 / ALPHA_DECAY_TICKS);
    let mut alpha = 1.0;

    for tick in 0..params.iterations {
        alpha += (0.0 - alpha) * alpha_decay;

        apply_position_forces(nodes, params, alpha);
        for _ in 0..params.collision_iterations {
            apply_collisions(nodes, params.collision_strength);
        }

        for node in nodes.iter_mut() {
            node.vx *= 1.0 - VELOCITY_DECAY;
            node.vy *= 1.0 - VELOCITY_DECAY;
            node.x += node.vx;
            node.y += node.vy;
        }

        if tick % 100 == 0 {
            log::trace!("relax tick {}: alpha {:.4}", tick, alpha);
        }
    }

    for node in nodes.iter_mut() {
        node.vx = 0.0;
        node.vy = 0.0;
    }
}

fn apply_position_forces(nodes: &mut [PeakLabelNode], params: &LabelLayoutParams, alpha: f64) {
    for node in nodes.iter_mut() {
        node.vx += (node.target_x - node.x) * params.x_strength * alpha;
        node.vy += (params.baseline_y - node.y) * params.y_strength * alpha;
    }
}

/// One collision pass over all pairs, on positions predicted by the
/// current velocities
///
/// The push is split between the two nodes in inverse proportion to their
/// areas, so small labels give way to large ones.
fn apply_collisions(nodes: &mut [PeakLabelNode], strength: f64) {
    let n = nodes.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = nodes.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let min_dist = a.radius + b.radius;
            let mut dx = (a.x + a.vx) - (b.x + b.vx);
            let mut dy = (a.y + a.vy) - (b.y + b.vy);
            let mut dist_sq = dx * dx + dy * dy;
            if dist_sq >= min_dist * min_dist {
                continue;
            }

            if dx == 0.0 {
                dx = jiggle(i, j);
                dist_sq += dx * dx;
            }
            if dy == 0.0 {
                dy = jiggle(j, i);
                dist_sq += dy * dy;
            }

            let dist = dist_sq.sqrt();
            let push = (min_dist - dist) / dist * strength;
            dx *= push;
            dy *= push;

            let ra = a.radius * a.radius;
            let rb = b.radius * b.radius;
            let share_a = rb / (ra + rb);
            a.vx += dx * share_a;
            a.vy += dy * share_a;
            b.vx -= dx * (1.0 - share_a);
            b.vy -= dy * (1.0 - share_a);
        }
    }
}

/// Tiny deterministic offset used to separate coincident nodes
fn jiggle(i: usize, j: usize) -> f64 {
    let sign = if i < j { -1.0 } else { 1.0 };
    sign * JIGGLE * (1 + (i + j) % 7) as f64
}
