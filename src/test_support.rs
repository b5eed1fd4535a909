//! Synthetic stock used by unit tests across modules.
//!
//! The population is simulated forward with Pope's approximation from known
//! recruitment and F. The plus group follows the VPA's catch-share split
//! (see [`consistent_plus_group`]), so a backward VPA started from the true
//! terminal stock reproduces it exactly and noise-free indices fit with zero
//! residuals.
use crate::{
    matrix::{AgeYearMatrix, Unit},
    tuning::index::{AbundanceIndex, IndexKind},
    vpa::{NaturalMortality, StockData, pope_catch},
};
use ndarray::Array1;

pub(crate) const START_YEAR: i32 = 2000;
pub(crate) const M: f64 = 0.4;

const SELECTIVITY: [f64; 5] = [0.1, 0.3, 0.5, 0.6, 0.6];
const WEIGHT_G: [f64; 5] = [10.0, 60.0, 150.0, 250.0, 350.0];
const MATURITY: [f64; 5] = [0.0, 0.2, 0.6, 1.0, 1.0];

pub(crate) struct SyntheticStock {
    pub stock: StockData,
    pub indices: Vec<AbundanceIndex>,
    pub mortality: NaturalMortality,
    pub true_stock: Vec<Vec<f64>>,
    pub true_f: Vec<Vec<f64>>,
}

impl SyntheticStock {
    pub fn terminal_f(&self) -> Array1<f64> {
        Array1::from_vec(self.true_f[self.true_f.len() - 1].clone())
    }

    pub fn terminal_stock(&self) -> Array1<f64> {
        Array1::from_vec(self.true_stock[self.true_stock.len() - 1].clone())
    }
}

/// Plus-group catch and next year's plus group for one forward step.
///
/// Given this year's plus group, second-oldest age, and second-oldest catch
/// under a common `m`, returns `(catch_plus, next_plus)` such that
/// [`resolve_plus_group`](crate::vpa::resolve_plus_group) maps `next_plus`
/// back onto the two stock numbers exactly. Eliminating `S e^{M}` from the
/// two split equations leaves a quadratic in the plus-group catch with one
/// positive root. `catch_second` must be positive.
pub(crate) fn consistent_plus_group(
    plus: f64, second_oldest: f64, catch_second: f64, m: f64,
) -> (f64, f64) {
    let h = (m / 2.0).exp();
    let a = second_oldest + catch_second * h;
    let b = catch_second * (second_oldest - plus - catch_second * h);
    let c = -catch_second * catch_second * plus;
    let catch_plus = (-b + (b * b - 4.0 * a * c).sqrt()) / (2.0 * a);
    let survivors = second_oldest * (catch_plus + catch_second) / catch_second - catch_second * h;
    (catch_plus, survivors * (-m).exp())
}

/// Five ages (plus group at 4), `years` years from 2000, M = 0.4.
pub(crate) fn synthetic_stock(years: usize) -> SyntheticStock {
    let ages = SELECTIVITY.len();
    let p = ages - 1;
    let mut n = vec![vec![0.0; ages]; years];
    let mut f = vec![vec![0.0; ages]; years];
    let mut catch = vec![vec![0.0; ages]; years];
    n[0] = vec![1000.0, 600.0, 350.0, 200.0, 250.0];
    for y in 0..years {
        let scale = 0.8 + 0.04 * y as f64;
        f[y] = SELECTIVITY.iter().map(|s| s * scale).collect();
        catch[y] = n[y].iter().zip(&f[y]).map(|(ni, fi)| pope_catch(*ni, *fi, M)).collect();
        if y + 1 == years {
            break;
        }
        let (catch_plus, next_plus) =
            consistent_plus_group(n[y][p], n[y][p - 1], catch[y][p - 1], M);
        catch[y][p] = catch_plus;
        let mut row = vec![0.0; ages];
        row[0] = 1000.0 * (1.0 + 0.3 * ((y + 1) as f64).sin());
        for a in 1..p {
            row[a] = n[y][a - 1] * (-(f[y][a - 1] + M)).exp();
        }
        row[p] = next_plus;
        n[y + 1] = row;
    }

    let year_range = (START_YEAR, START_YEAR + years as i32 - 1);
    let age_range = (0, ages as u32 - 1);
    let stock = StockData::new(
        AgeYearMatrix::from_rows(Unit::ThousandFish, year_range, age_range, catch).unwrap(),
        AgeYearMatrix::from_fn(Unit::Gram, year_range, age_range, |_, a| WEIGHT_G[a as usize])
            .unwrap(),
        AgeYearMatrix::from_fn(Unit::Dimensionless, year_range, age_range, |_, a| {
            MATURITY[a as usize]
        })
        .unwrap(),
    )
    .unwrap();

    // thousands of fish × grams = kilograms
    let ssb_tonnes: Vec<f64> = n
        .iter()
        .map(|row| row.iter().enumerate().map(|(a, ni)| ni * WEIGHT_G[a] * MATURITY[a]).sum())
        .map(|kg: f64| kg / 1000.0)
        .collect();
    let indices = vec![
        AbundanceIndex::new(
            "recruit survey",
            IndexKind::Age0Abundance,
            START_YEAR,
            n.iter().map(|row| 0.002 * row[0].powf(0.8)).collect(),
        )
        .unwrap(),
        AbundanceIndex::new(
            "age-1 survey",
            IndexKind::Age1Abundance,
            START_YEAR,
            n.iter().map(|row| 0.01 * row[1]).collect(),
        )
        .unwrap(),
        AbundanceIndex::new(
            "egg survey",
            IndexKind::SpawningBiomass,
            START_YEAR,
            ssb_tonnes.iter().map(|s| 0.5 * s).collect(),
        )
        .unwrap(),
    ];

    SyntheticStock {
        stock,
        indices,
        mortality: NaturalMortality::Constant(M),
        true_stock: n,
        true_f: f,
    }
}
