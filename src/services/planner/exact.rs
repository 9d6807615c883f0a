//! Exact round-trip search for small stop counts
//!
//! Depth-first enumeration of visiting orders in lexicographic index order,
//! pruning any prefix that already costs at least the best complete tour.
//! Only a strictly shorter tour replaces the incumbent, so among equally
//! short tours the lexicographically first one wins.

/// Optimal visiting order over a distance matrix whose index 0 is the origin.
/// Returns stop indices (1..n) in visit order.
pub(super) fn exact_order(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    if n <= 1 {
        return vec![];
    }

    let mut search = Search {
        matrix,
        visited: vec![false; n],
        path: Vec::with_capacity(n - 1),
        best_order: vec![],
        best_cost: f64::INFINITY,
    };
    search.visited[0] = true;
    search.descend(0, 0.0);

    search.best_order
}

struct Search<'a> {
    matrix: &'a [Vec<f64>],
    visited: Vec<bool>,
    path: Vec<usize>,
    best_order: Vec<usize>,
    best_cost: f64,
}

impl Search<'_> {
    fn descend(&mut self, current: usize, cost: f64) {
        let n = self.matrix.len();

        if self.path.len() == n - 1 {
            let total = cost + self.matrix[current][0];
            if total < self.best_cost {
                self.best_cost = total;
                self.best_order = self.path.clone();
            }
            return;
        }

        for next in 1..n {
            if self.visited[next] {
                continue;
            }

            // Distances are non-negative, so this prefix cannot beat the incumbent
            let partial = cost + self.matrix[current][next];
            if partial >= self.best_cost {
                continue;
            }

            self.visited[next] = true;
            self.path.push(next);
            self.descend(next, partial);
            self.path.pop();
            self.visited[next] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geo::round_trip_distance;

    // Greedy goes 0 -> 1 -> 2 -> 3 -> 0 (12.0), the optimum is 0 -> 1 -> 3 -> 2 -> 0 (9.5)
    fn greedy_trap() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 1.5, 5.0],
            vec![1.0, 0.0, 5.0, 6.0],
            vec![1.5, 5.0, 0.0, 1.0],
            vec![5.0, 6.0, 1.0, 0.0],
        ]
    }

    #[test]
    fn test_exact_finds_optimum() {
        let matrix = greedy_trap();
        let order = exact_order(&matrix);

        assert_eq!(order, vec![1, 3, 2]);
        assert!((round_trip_distance(&matrix, &order) - 9.5).abs() < 1e-9);
    }

    #[test]
    fn test_exact_beats_nearest_neighbor_on_trap() {
        let matrix = greedy_trap();
        let greedy = super::super::nearest_neighbor(&matrix);

        assert_eq!(greedy, vec![1, 2, 3]);
        assert!(
            round_trip_distance(&matrix, &exact_order(&matrix))
                < round_trip_distance(&matrix, &greedy)
        );
    }

    #[test]
    fn test_exact_single_stop() {
        let matrix = vec![vec![0.0, 4.0], vec![4.0, 0.0]];
        assert_eq!(exact_order(&matrix), vec![1]);
    }

    #[test]
    fn test_exact_trivial_matrices() {
        assert!(exact_order(&[]).is_empty());
        assert!(exact_order(&[vec![0.0]]).is_empty());
    }

    #[test]
    fn test_exact_prefers_lexicographic_order_on_ties() {
        // Every tour has the same length
        let matrix = vec![
            vec![0.0, 1.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0, 1.0],
            vec![1.0, 1.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0, 0.0],
        ];

        assert_eq!(exact_order(&matrix), vec![1, 2, 3]);
    }
}
