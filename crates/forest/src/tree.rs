//! CART decision tree with Gini impurity.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Candidate features examined per split.
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

/// A fitted tree. Nodes are stored flat; index 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
}

struct PendingNode {
    id: usize,
    samples: Vec<usize>,
    depth: usize,
}

impl DecisionTree {
    /// Grow a tree over `samples` (indices into `x`/`y`, duplicates allowed).
    ///
    /// `y` holds class indices in `0..n_classes`.
    pub fn fit<R: Rng + ?Sized>(
        x: &[&[f32]],
        y: &[usize],
        n_classes: usize,
        samples: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = x.first().map(|row| row.len()).unwrap_or(0);
        let mut nodes = vec![Node::Leaf { class: 0 }];
        let mut stack = vec![PendingNode {
            id: 0,
            samples,
            depth: 0,
        }];

        while let Some(PendingNode { id, samples, depth }) = stack.pop() {
            let counts = class_counts(y, &samples, n_classes);
            let majority = argmax(&counts);

            let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
            let too_small = samples.len() < params.min_samples_split;
            let too_deep = params.max_depth.is_some_and(|max| depth >= max);
            if pure || too_small || too_deep {
                nodes[id] = Node::Leaf { class: majority };
                continue;
            }

            let Some((feature, threshold)) =
                best_split(x, y, n_classes, &samples, n_features, params, rng)
            else {
                nodes[id] = Node::Leaf { class: majority };
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) =
                samples.iter().partition(|&&i| x[i][feature] <= threshold);

            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf { class: majority });
            nodes.push(Node::Leaf { class: majority });
            nodes[id] = Node::Split {
                feature,
                threshold,
                left,
                right,
            };

            stack.push(PendingNode {
                id: left,
                samples: left_samples,
                depth: depth + 1,
            });
            stack.push(PendingNode {
                id: right,
                samples: right_samples,
                depth: depth + 1,
            });
        }

        Self { nodes }
    }

    /// Class index for a feature vector. The caller checks the length.
    pub fn predict(&self, features: &[f32]) -> usize {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Highest class index referenced by a leaf, and highest feature index
    /// referenced by a split. Used to validate deserialized trees.
    pub fn max_indices(&self) -> (usize, Option<usize>) {
        let mut max_class = 0;
        let mut max_feature = None;
        for node in &self.nodes {
            match node {
                Node::Leaf { class } => max_class = max_class.max(*class),
                Node::Split { feature, .. } => {
                    max_feature = Some(max_feature.map_or(*feature, |m: usize| m.max(*feature)))
                }
            }
        }
        (max_class, max_feature)
    }

    /// Every split points at existing, later nodes.
    pub fn is_well_formed(&self) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(id, node)| match node {
                Node::Leaf { .. } => true,
                Node::Split { left, right, .. } => {
                    *left > id && *right > id && *left < self.nodes.len() && *right < self.nodes.len()
                }
            })
    }
}

fn class_counts(y: &[usize], samples: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0; n_classes];
    for &i in samples {
        counts[y[i]] += 1;
    }
    counts
}

/// Index of the largest count; ties go to the lowest index.
pub(crate) fn argmax(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best
}

/// Weighted Gini impurity of one side, scaled by its sample count.
fn weighted_gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts.iter().map(|&c| (c * c) as f64).sum();
    n as f64 - sum_sq / n as f64
}

/// Find the lowest-impurity split over a random subset of features.
///
/// Features are visited in random order. The search stops once
/// `max_features` features have been examined and a valid split exists,
/// so a node is only left unsplit when no feature separates its samples.
fn best_split<R: Rng + ?Sized>(
    x: &[&[f32]],
    y: &[usize],
    n_classes: usize,
    samples: &[usize],
    n_features: usize,
    params: &TreeParams,
    rng: &mut R,
) -> Option<(usize, f32)> {
    let mut order: Vec<usize> = (0..n_features).collect();
    order.shuffle(rng);

    let total = class_counts(y, samples, n_classes);
    let n = samples.len();
    let min_leaf = params.min_samples_leaf.max(1);

    let mut best: Option<(f64, usize, f32)> = None;
    let mut visited = 0;
    let mut column: Vec<(f32, usize)> = Vec::with_capacity(n);

    for feature in order {
        if visited >= params.max_features && best.is_some() {
            break;
        }
        visited += 1;

        column.clear();
        column.extend(samples.iter().map(|&i| (x[i][feature], y[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = vec![0usize; n_classes];
        let mut right = total.clone();

        for pos in 1..n {
            let (prev_value, prev_class) = column[pos - 1];
            left[prev_class] += 1;
            right[prev_class] -= 1;

            let value = column[pos].0;
            if value <= prev_value {
                continue;
            }
            if pos < min_leaf || n - pos < min_leaf {
                continue;
            }

            let impurity = weighted_gini(&left, pos) + weighted_gini(&right, n - pos);
            if best.map_or(true, |(b, _, _)| impurity < b) {
                let mut threshold = prev_value + (value - prev_value) / 2.0;
                if threshold >= value {
                    threshold = prev_value;
                }
                best = Some((impurity, feature, threshold));
            }
        }
    }

    best.map(|(_, feature, threshold)| (feature, threshold))
}
