//! Named TTC distributions and their parameter validation.
//!
//! Only arity and parameter ranges are checked here; sampling belongs to
//! the simulator that consumes the model.

use std::fmt;

use thiserror::Error;

/// A validated TTC distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    Bernoulli { probability: f64 },
    Binomial { trials: u32, probability: f64 },
    Exponential { lambda: f64 },
    Gamma { shape: f64, scale: f64 },
    LogNormal { mean: f64, standard_deviation: f64 },
    Pareto { min: f64, shape: f64 },
    TruncatedNormal { mean: f64, standard_deviation: f64 },
    Uniform { min: f64, max: f64 },
    EasyAndCertain,
    EasyButUncertain,
    HardButCertain,
    HardAndUncertain,
    VeryHardButCertain,
    VeryHardAndUncertain,
    Infinity,
    Zero,
    Enabled,
    Disabled,
}

/// Why a distribution call was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("Distribution '{0}' is not supported")]
    Unsupported(String),

    #[error("Expected exactly {expected}, for {name} distribution")]
    Arity {
        name: &'static str,
        expected: &'static str,
    },

    #[error("Expected exactly zero parameters, for combination distributions")]
    CombinationArity,

    #[error("{value:?} is not in valid range '{range}', for {name} distribution")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("({min:?}, {max:?}) does not meet requirement 'min <= max', for Uniform distribution")]
    UniformBounds { min: f64, max: f64 },
}

/// Distributions whose samples are not meaningful beneath `-`, `/` or `^`.
pub const RESTRICTED_IN_ARITHMETIC: &[&str] = &["Bernoulli", "EasyAndUncertain", "EasyButUncertain"];

fn exactly<const N: usize>(
    name: &'static str,
    expected: &'static str,
    params: &[f64],
) -> Result<[f64; N], DistributionError> {
    <[f64; N]>::try_from(params).map_err(|_| DistributionError::Arity { name, expected })
}

fn positive(name: &'static str, range: &'static str, value: f64) -> Result<f64, DistributionError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(DistributionError::OutOfRange { name, value, range })
    }
}

fn probability(name: &'static str, value: f64) -> Result<f64, DistributionError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DistributionError::OutOfRange {
            name,
            value,
            range: "0 <= probability <= 1",
        })
    }
}

impl Distribution {
    /// Validate `name(params)` against the distribution table.
    pub fn new(name: &str, params: &[f64]) -> Result<Self, DistributionError> {
        let combination = match name {
            "Bernoulli" => {
                let [p] = exactly::<1>("Bernoulli", "one parameter (probability)", params)?;
                return Ok(Self::Bernoulli {
                    probability: probability("Bernoulli", p)?,
                });
            }
            "Binomial" => {
                let [n, p] = exactly::<2>("Binomial", "two parameters (trials, probability)", params)?;
                return Ok(Self::Binomial {
                    trials: n.round().max(0.0) as u32,
                    probability: probability("Binomial", p)?,
                });
            }
            "Exponential" => {
                let [lambda] = exactly::<1>("Exponential", "one parameter (lambda)", params)?;
                return Ok(Self::Exponential {
                    lambda: positive("Exponential", "lambda > 0", lambda)?,
                });
            }
            "Gamma" => {
                let [shape, scale] = exactly::<2>("Gamma", "two parameters (shape, scale)", params)?;
                return Ok(Self::Gamma {
                    shape: positive("Gamma", "shape > 0", shape)?,
                    scale: positive("Gamma", "scale > 0", scale)?,
                });
            }
            "LogNormal" => {
                let [mean, sd] = exactly::<2>(
                    "LogNormal",
                    "two parameters (mean, standardDeviation)",
                    params,
                )?;
                return Ok(Self::LogNormal {
                    mean,
                    standard_deviation: positive("LogNormal", "standardDeviation > 0", sd)?,
                });
            }
            "Pareto" => {
                let [min, shape] = exactly::<2>("Pareto", "two parameters (min, shape)", params)?;
                return Ok(Self::Pareto {
                    min: positive("Pareto", "min > 0", min)?,
                    shape: positive("Pareto", "shape > 0", shape)?,
                });
            }
            "TruncatedNormal" => {
                let [mean, sd] = exactly::<2>(
                    "TruncatedNormal",
                    "two parameters (mean, standardDeviation)",
                    params,
                )?;
                return Ok(Self::TruncatedNormal {
                    mean,
                    standard_deviation: positive("TruncatedNormal", "standardDeviation > 0", sd)?,
                });
            }
            "Uniform" => {
                let [min, max] = exactly::<2>("Uniform", "two parameters (min, max)", params)?;
                if min > max {
                    return Err(DistributionError::UniformBounds { min, max });
                }
                return Ok(Self::Uniform { min, max });
            }
            "EasyAndCertain" => Self::EasyAndCertain,
            "EasyButUncertain" => Self::EasyButUncertain,
            "HardButCertain" => Self::HardButCertain,
            "HardAndUncertain" => Self::HardAndUncertain,
            "VeryHardButCertain" => Self::VeryHardButCertain,
            "VeryHardAndUncertain" => Self::VeryHardAndUncertain,
            "Infinity" => Self::Infinity,
            "Zero" => Self::Zero,
            "Enabled" => Self::Enabled,
            "Disabled" => Self::Disabled,
            other => return Err(DistributionError::Unsupported(other.to_string())),
        };
        if !params.is_empty() {
            return Err(DistributionError::CombinationArity);
        }
        Ok(combination)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bernoulli { .. } => "Bernoulli",
            Self::Binomial { .. } => "Binomial",
            Self::Exponential { .. } => "Exponential",
            Self::Gamma { .. } => "Gamma",
            Self::LogNormal { .. } => "LogNormal",
            Self::Pareto { .. } => "Pareto",
            Self::TruncatedNormal { .. } => "TruncatedNormal",
            Self::Uniform { .. } => "Uniform",
            Self::EasyAndCertain => "EasyAndCertain",
            Self::EasyButUncertain => "EasyButUncertain",
            Self::HardButCertain => "HardButCertain",
            Self::HardAndUncertain => "HardAndUncertain",
            Self::VeryHardButCertain => "VeryHardButCertain",
            Self::VeryHardAndUncertain => "VeryHardAndUncertain",
            Self::Infinity => "Infinity",
            Self::Zero => "Zero",
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Bernoulli { probability } => write!(f, "Bernoulli({probability:?})"),
            Self::Binomial {
                trials,
                probability,
            } => write!(f, "Binomial({trials}, {probability:?})"),
            Self::Exponential { lambda } => write!(f, "Exponential({lambda:?})"),
            Self::Gamma { shape, scale } => write!(f, "Gamma({shape:?}, {scale:?})"),
            Self::LogNormal {
                mean,
                standard_deviation,
            } => write!(f, "LogNormal({mean:?}, {standard_deviation:?})"),
            Self::Pareto { min, shape } => write!(f, "Pareto({min:?}, {shape:?})"),
            Self::TruncatedNormal {
                mean,
                standard_deviation,
            } => write!(f, "TruncatedNormal({mean:?}, {standard_deviation:?})"),
            Self::Uniform { min, max } => write!(f, "Uniform({min:?}, {max:?})"),
            other => f.write_str(other.name()),
        }
    }
}
