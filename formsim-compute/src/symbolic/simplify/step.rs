use std::fmt;

/// A rewrite applied by the simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// `0+a = a`
    AddZero,

    /// `(a+b)+c = a+b+c`
    FlattenSum,

    /// `a+a = 2a`
    CombineLikeTerms,

    /// `0*a = 0`
    MultiplyZero,

    /// `1*a = a`
    MultiplyOne,

    /// `(a*b)*c = a*b*c`
    FlattenProduct,

    /// `3/12 = 1/4`
    ReduceFraction,

    /// `a^b*a^c = a^(b+c)`
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `0^a = 0`
    PowerZeroLeft,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,

    /// `(a^b)^c = a^(b*c)`
    PowerPower,

    /// `2^3 = 8`
    NumericPower,

    /// `(a+b)^2 = a^2 + 2ab + b^2`
    ExpandPower,

    /// `a*(b+c) = a*b + a*c`
    DistributiveProperty,

    /// `(a*b)^c = a^c * b^c`
    DistributePower,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::AddZero => "remove zero terms",
            Self::FlattenSum => "flatten nested sums",
            Self::CombineLikeTerms => "combine like terms",
            Self::MultiplyZero => "multiply by zero",
            Self::MultiplyOne => "remove factors of one",
            Self::FlattenProduct => "flatten nested products",
            Self::ReduceFraction => "reduce fraction",
            Self::CombineLikeFactors => "combine like factors",
            Self::PowerZero => "raise to the power of zero",
            Self::PowerZeroLeft => "raise zero to a power",
            Self::PowerOneLeft => "raise one to a power",
            Self::PowerOne => "raise to the power of one",
            Self::PowerPower => "multiply nested exponents",
            Self::NumericPower => "evaluate numeric power",
            Self::ExpandPower => "expand power of a sum",
            Self::DistributiveProperty => "distribute multiplication over addition",
            Self::DistributePower => "distribute power over multiplication",
        };
        f.write_str(description)
    }
}
