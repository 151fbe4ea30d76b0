//! Deterministic truncated factorization of a sparse row matrix.
//!
//! Orthogonal iteration on the Gram matrix, seeded from the largest-norm
//! columns, so rebuilding from the same corpus reproduces the factorization
//! bit for bit. Rows are (column, value) pairs sorted by column.

const MAX_ITERS: usize = 60;
const TOL: f64 = 1e-9;
const EPS: f64 = 1e-12;

/// Rank-reduced factorization: `components` holds one row per latent
/// dimension (a unit vector over the column space); dimensions whose
/// singular value is zero are all-zero rows.
pub struct TruncatedSvd {
    pub components: Vec<Vec<f64>>,
    pub singular_values: Vec<f64>,
}

impl TruncatedSvd {
    /// Fit a rank-`k` factorization of the matrix whose rows are given
    /// sparsely over `n_cols` columns. `k` must not exceed `n_cols` unless
    /// `n_cols` is zero, in which case every dimension is degenerate.
    pub fn fit(rows: &[Vec<(usize, f64)>], n_cols: usize, k: usize) -> Self {
        let k = k.max(1);
        if n_cols == 0 {
            return Self {
                components: vec![Vec::new(); k],
                singular_values: vec![0.0; k],
            };
        }
        let k = k.min(n_cols);

        // Seed with unit vectors on the heaviest columns (ties: lower index).
        let mut col_norms = vec![0.0f64; n_cols];
        for row in rows {
            for &(col, val) in row {
                col_norms[col] += val * val;
            }
        }
        let mut heaviest: Vec<usize> = (0..n_cols).collect();
        heaviest.sort_by(|&a, &b| {
            col_norms[b]
                .partial_cmp(&col_norms[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        let mut basis: Vec<Vec<f64>> = heaviest
            .iter()
            .take(k)
            .map(|&col| {
                let mut v = vec![0.0; n_cols];
                v[col] = 1.0;
                v
            })
            .collect();

        let mut prev_eigs = vec![0.0f64; k];
        for _ in 0..MAX_ITERS {
            // W = AᵗA V, one matrix application per basis vector.
            let mut w: Vec<Vec<f64>> = basis
                .iter()
                .map(|v| {
                    let u = mat_vec(rows, v);
                    mat_t_vec(rows, &u, n_cols)
                })
                .collect();

            // Modified Gram-Schmidt; the pre-normalization length of each
            // vector estimates its eigenvalue.
            let mut eigs = vec![0.0f64; k];
            for j in 0..k {
                let (done, rest) = w.split_at_mut(j);
                let wj = &mut rest[0];
                for wl in done.iter() {
                    let proj = dot(wj, wl);
                    for (x, &y) in wj.iter_mut().zip(wl.iter()) {
                        *x -= proj * y;
                    }
                }
                let len = norm(wj);
                eigs[j] = len;
                if len > EPS {
                    for x in wj.iter_mut() {
                        *x /= len;
                    }
                } else {
                    for x in wj.iter_mut() {
                        *x = 0.0;
                    }
                }
            }
            basis = w;

            let mut max_delta = 0.0f64;
            for j in 0..k {
                let delta = (eigs[j] - prev_eigs[j]).abs() / eigs[j].max(1.0);
                max_delta = max_delta.max(delta);
            }
            prev_eigs = eigs;
            if max_delta < TOL {
                break;
            }
        }

        // Order dimensions by singular value, largest first.
        let mut spectrum: Vec<(f64, Vec<f64>)> = basis
            .into_iter()
            .map(|v| (norm(&mat_vec(rows, &v)), v))
            .collect();
        spectrum.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let (singular_values, components) = spectrum.into_iter().unzip();
        Self {
            components,
            singular_values,
        }
    }

    /// Project a sparse row into the latent space. Documents and queries go
    /// through this same transform.
    pub fn transform(&self, row: &[(usize, f64)]) -> Vec<f64> {
        self.components
            .iter()
            .map(|comp| row.iter().map(|&(col, val)| val * comp[col]).sum())
            .collect()
    }

    pub fn rank(&self) -> usize {
        self.components.len()
    }
}

fn mat_vec(rows: &[Vec<(usize, f64)>], v: &[f64]) -> Vec<f64> {
    rows.iter()
        .map(|row| row.iter().map(|&(col, val)| val * v[col]).sum())
        .collect()
}

fn mat_t_vec(rows: &[Vec<(usize, f64)>], u: &[f64], n_cols: usize) -> Vec<f64> {
    let mut out = vec![0.0f64; n_cols];
    for (row, &weight) in rows.iter().zip(u.iter()) {
        if weight != 0.0 {
            for &(col, val) in row {
                out[col] += val * weight;
            }
        }
    }
    out
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}
