//! Truncated SVD projection of the TF-IDF matrix into a small dense space.
//!
//! Only the top `k` right singular vectors are computed. When the smaller
//! matrix side fits within `k` plus the oversampling margin, the Gram matrix
//! is diagonalized exactly with cyclic Jacobi rotations. Larger corpora go
//! through a randomized range finder with subspace iteration (Halko,
//! Martinsson & Tropp), so a fit costs O(nnz·k + (n_docs + n_terms)·k²)
//! instead of growing with the cube of the corpus.
//!
//! The random test matrix comes from a fixed-seed ChaCha stream: rebuilding
//! the same corpus always yields the same components.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::SparseVector;

/// Eigenvalues at or below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;
const MAX_SWEEPS: usize = 100;
/// Extra random directions sampled beyond `k`.
const OVERSAMPLES: usize = 10;
const RANGE_SEED: u64 = 0x5eed_0f_ba5e;

/// How a [`Reducer`] was fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decomposition {
    Exact,
    Randomized { power_iterations: usize },
}

/// Fitted projection onto the top right singular vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Reducer {
    /// `k × n_terms`, one unit-norm component per row.
    components: Array2<f64>,
    singular_values: Vec<f64>,
    decomposition: Decomposition,
}

impl Reducer {
    /// Fit at most `max_components` components of the `rows.len() × n_terms`
    /// matrix whose rows are `rows`. Returns `None` when the matrix has no
    /// non-zero singular value.
    pub fn fit(rows: &[SparseVector], n_terms: usize, max_components: usize) -> Option<Self> {
        let n_docs = rows.len();
        let k = max_components.min(n_docs).min(n_terms);
        if k == 0 {
            return None;
        }

        let smaller_side = n_docs.min(n_terms);
        let sample_width = k + OVERSAMPLES;
        let (singular_values, components, decomposition) = if smaller_side <= sample_width {
            let (values, components) = fit_exact(rows, n_terms, k)?;
            (values, components, Decomposition::Exact)
        } else {
            // sklearn's "auto" power iteration count
            let power_iterations = if (k as f64) < 0.1 * smaller_side as f64 { 7 } else { 4 };
            let (values, components) =
                fit_randomized(rows, n_terms, k, sample_width, power_iterations)?;
            (values, components, Decomposition::Randomized { power_iterations })
        };

        Some(Self {
            components,
            singular_values,
            decomposition,
        })
    }

    /// Number of dense dimensions.
    pub fn width(&self) -> usize {
        self.components.nrows()
    }

    /// Singular values of the kept components, largest first.
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    pub fn decomposition(&self) -> Decomposition {
        self.decomposition
    }

    /// Project every row: `X·Vₖᵀ`.
    pub fn project_rows(&self, rows: &[SparseVector]) -> Array2<f64> {
        sparse_dot(rows, self.components.t())
    }

    /// Project one sparse vector through the same components.
    pub fn project(&self, vector: &SparseVector) -> Array1<f64> {
        let mut out = Array1::zeros(self.width());
        for (col, weight) in vector.iter() {
            out.scaled_add(weight, &self.components.column(col));
        }
        out
    }
}

/// Diagonalize the full Gram matrix of the smaller side.
fn fit_exact(rows: &[SparseVector], n_terms: usize, k: usize) -> Option<(Vec<f64>, Array2<f64>)> {
    let dense = to_dense(rows, n_terms);
    if rows.len() <= n_terms {
        // v = Xᵀu / σ
        let gram = dense.dot(&dense.t());
        top_components(gram, k, n_terms, |u, sigma| dense.t().dot(&u) / sigma)
    } else {
        let gram = dense.t().dot(&dense);
        top_components(gram, k, n_terms, |v, _| v.to_owned())
    }
}

/// Randomized range finder: `Q` spans the dominant column space of `X`, and
/// the SVD of the small `B = QᵀX` gives the right singular vectors.
fn fit_randomized(
    rows: &[SparseVector],
    n_terms: usize,
    k: usize,
    sample_width: usize,
    power_iterations: usize,
) -> Option<(Vec<f64>, Array2<f64>)> {
    let mut rng = ChaCha20Rng::seed_from_u64(RANGE_SEED);
    let omega = Array2::<f64>::from_shape_fn((n_terms, sample_width), |_| rng.gen_range(-1.0..1.0));

    let mut q = orthonormalize(sparse_dot(rows, omega.view()));
    for _ in 0..power_iterations {
        let z = sparse_t_dot(rows, n_terms, q.view());
        q = orthonormalize(sparse_dot(rows, z.view()));
    }

    // Bᵀ = XᵀQ, so B·Bᵀ is sample_width × sample_width and v = Bᵀu / σ
    let bt = sparse_t_dot(rows, n_terms, q.view());
    let gram = bt.t().dot(&bt);
    top_components(gram, k, n_terms, |u, sigma| bt.dot(&u) / sigma)
}

/// Eigendecompose `gram`, keep the `k` largest non-degenerate eigenpairs, and
/// lift each eigenvector to a term-space component.
fn top_components<F>(
    gram: Array2<f64>,
    k: usize,
    n_terms: usize,
    lift: F,
) -> Option<(Vec<f64>, Array2<f64>)>
where
    F: Fn(ArrayView1<f64>, f64) -> Array1<f64>,
{
    let (eigenvalues, eigenvectors) = jacobi_eigen(gram);
    let mut order: Vec<usize> = (0..eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));

    let largest = order.first().map(|&i| eigenvalues[i]).unwrap_or(0.0);
    if largest <= 0.0 {
        return None;
    }

    let mut singular_values = Vec::with_capacity(k);
    let mut components = Array2::zeros((k, n_terms));
    for &i in order.iter().take(k) {
        let lambda = eigenvalues[i];
        if lambda <= largest * RANK_TOLERANCE {
            break;
        }
        let sigma = lambda.sqrt();
        let mut component = lift(eigenvectors.column(i), sigma);
        flip_sign(&mut component);
        components.row_mut(singular_values.len()).assign(&component);
        singular_values.push(sigma);
    }

    let width = singular_values.len();
    if width == 0 {
        return None;
    }
    Some((singular_values, components.slice_move(ndarray::s![..width, ..])))
}

/// Make the largest-magnitude entry of a component positive.
fn flip_sign(component: &mut Array1<f64>) {
    let pivot = component
        .iter()
        .copied()
        .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        component.mapv_inplace(|x| -x);
    }
}

fn to_dense(rows: &[SparseVector], n_terms: usize) -> Array2<f64> {
    let mut dense = Array2::zeros((rows.len(), n_terms));
    for (mut dst, row) in dense.axis_iter_mut(Axis(0)).zip(rows) {
        for (col, weight) in row.iter() {
            dst[col] = weight;
        }
    }
    dense
}

/// `X·M` where `X` has `rows` as its rows and `M` is `n_terms × w`.
fn sparse_dot(rows: &[SparseVector], m: ArrayView2<f64>) -> Array2<f64> {
    let mut out = Array2::zeros((rows.len(), m.ncols()));
    for (mut dst, row) in out.axis_iter_mut(Axis(0)).zip(rows) {
        for (col, weight) in row.iter() {
            dst.scaled_add(weight, &m.row(col));
        }
    }
    out
}

/// `Xᵀ·M` where `X` has `rows` as its rows and `M` is `rows.len() × w`.
fn sparse_t_dot(rows: &[SparseVector], n_terms: usize, m: ArrayView2<f64>) -> Array2<f64> {
    let mut out = Array2::zeros((n_terms, m.ncols()));
    for (row, src) in rows.iter().zip(m.axis_iter(Axis(0))) {
        for (col, weight) in row.iter() {
            out.row_mut(col).scaled_add(weight, &src);
        }
    }
    out
}

/// Modified Gram-Schmidt over columns. Columns that collapse onto the span of
/// earlier ones are zeroed.
fn orthonormalize(mut m: Array2<f64>) -> Array2<f64> {
    for j in 0..m.ncols() {
        let original = m.column(j).dot(&m.column(j)).sqrt();
        for i in 0..j {
            let basis = m.column(i).to_owned();
            let overlap = basis.dot(&m.column(j));
            m.column_mut(j).scaled_add(-overlap, &basis);
        }
        let norm = m.column(j).dot(&m.column(j)).sqrt();
        if norm > original * RANK_TOLERANCE && norm > 0.0 {
            m.column_mut(j).mapv_inplace(|x| x / norm);
        } else {
            m.column_mut(j).fill(0.0);
        }
    }
    m
}

/// Cyclic Jacobi eigendecomposition of a symmetric matrix.
/// Returns eigenvalues and the matrix whose columns are the eigenvectors.
fn jacobi_eigen(mut a: Array2<f64>) -> (Vec<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::<f64>::eye(n);

    let scale: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let threshold = scale * 1e-14;

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| a[[p, q]] * a[[p, q]])
            .sum::<f64>()
            .sqrt();
        if off <= threshold {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    let eigenvalues = (0..n).map(|i| a[[i, i]]).collect();
    (eigenvalues, v)
}

/// Cosine similarity of two dense vectors; zero when either is all zeros.
pub fn dense_cosine(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom > 0.0 {
        a.dot(&b) / denom
    } else {
        0.0
    }
}
