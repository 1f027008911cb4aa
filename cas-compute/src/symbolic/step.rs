//! The record of a single transformation applied to an expression.

use cas_parser::parser::ast::AstNode;
use std::fmt::{Display, Formatter, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of operation that produced a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operation {
    Simplify,
    Differentiate,
    Integrate,
    Solve,
    Expand,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Simplify => write!(f, "simplify"),
            Self::Differentiate => write!(f, "differentiate"),
            Self::Integrate => write!(f, "integrate"),
            Self::Solve => write!(f, "solve"),
            Self::Expand => write!(f, "expand"),
        }
    }
}

/// Every rule that can be applied to an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rule {
    // arithmetic
    EvaluateConstant,
    EvaluateFunction,
    AddZero,
    SubtractZero,
    MultiplyZero,
    MultiplyOne,
    CombineNumericFactors,
    SubtractNegative,

    // algebraic
    CombineLikeTerms,
    SimplifyFraction,
    FactorCommonTerm,
    ExpandProduct,

    // trigonometric
    PythagoreanIdentity,
    TrigParity,
    TrigExactValue,

    // exponential
    PowerZero,
    PowerOne,
    PowerOfOne,
    PowerOfZero,
    PowerOfPower,
    CombineLikeFactors,
    ExpProduct,
    ExpOfLn,
    SqrtSquared,
    SqrtOfSquare,

    // logarithmic
    LnOfOne,
    LnOfBase,
    LnOfExp,
    LogSum,
    LogDifference,
    LogOfPower,

    // differentiation
    ConstantRule,
    SumRule,
    DifferenceRule,
    ProductRule,
    QuotientRule,
    PowerRule,
    ExponentialRule,
    GeneralPowerRule,
    ChainRule,
    FundamentalTheorem,

    // integration
    IntegrateConstant,
    IntegratePower,
    IntegrateReciprocal,
    IntegrateSum,
    ConstantMultiple,
    IntegrateFunction,
    LinearSubstitution,
    IntegrationConstant,
    EvaluateBounds,
    Unevaluated,

    // solving
    Normalize,
    LinearFormula,
    QuadraticFormula,
    NumericRoots,
    GaussianElimination,

    // series
    TaylorTerm,
    TaylorRemainder,
}

impl Rule {
    /// The human-readable name of the rule.
    pub fn name(self) -> &'static str {
        match self {
            Self::EvaluateConstant => "evaluate constant",
            Self::EvaluateFunction => "evaluate function",
            Self::AddZero => "add zero",
            Self::SubtractZero => "subtract zero",
            Self::MultiplyZero => "multiply by zero",
            Self::MultiplyOne => "multiply by one",
            Self::CombineNumericFactors => "combine numeric factors",
            Self::SubtractNegative => "subtract negative",
            Self::CombineLikeTerms => "combine like terms",
            Self::SimplifyFraction => "simplify fraction",
            Self::FactorCommonTerm => "factor common term",
            Self::ExpandProduct => "expand product",
            Self::PythagoreanIdentity => "pythagorean identity",
            Self::TrigParity => "trigonometric parity",
            Self::TrigExactValue => "exact trigonometric value",
            Self::PowerZero => "power of zero",
            Self::PowerOne => "power of one",
            Self::PowerOfOne => "one to a power",
            Self::PowerOfZero => "zero to a power",
            Self::PowerOfPower => "power of a power",
            Self::CombineLikeFactors => "combine like factors",
            Self::ExpProduct => "product of exponentials",
            Self::ExpOfLn => "exponential of logarithm",
            Self::SqrtSquared => "square of a square root",
            Self::SqrtOfSquare => "square root of a square",
            Self::LnOfOne => "logarithm of one",
            Self::LnOfBase => "logarithm of its base",
            Self::LnOfExp => "logarithm of exponential",
            Self::LogSum => "sum of logarithms",
            Self::LogDifference => "difference of logarithms",
            Self::LogOfPower => "logarithm of a power",
            Self::ConstantRule => "constant rule",
            Self::SumRule => "sum rule",
            Self::DifferenceRule => "difference rule",
            Self::ProductRule => "product rule",
            Self::QuotientRule => "quotient rule",
            Self::PowerRule => "power rule",
            Self::ExponentialRule => "exponential rule",
            Self::GeneralPowerRule => "generalized power rule",
            Self::ChainRule => "chain rule",
            Self::FundamentalTheorem => "fundamental theorem of calculus",
            Self::IntegrateConstant => "integral of a constant",
            Self::IntegratePower => "power rule for integrals",
            Self::IntegrateReciprocal => "integral of a reciprocal",
            Self::IntegrateSum => "sum rule for integrals",
            Self::ConstantMultiple => "constant multiple rule",
            Self::IntegrateFunction => "integral of a known function",
            Self::LinearSubstitution => "linear substitution",
            Self::IntegrationConstant => "constant of integration",
            Self::EvaluateBounds => "evaluate at bounds",
            Self::Unevaluated => "no rule applies",
            Self::Normalize => "move all terms to one side",
            Self::LinearFormula => "solve linear equation",
            Self::QuadraticFormula => "quadratic formula",
            Self::NumericRoots => "numeric root finding",
            Self::GaussianElimination => "gaussian elimination",
            Self::TaylorTerm => "taylor term",
            Self::TaylorRemainder => "taylor remainder",
        }
    }

    /// A short sentence describing what the rule does.
    pub fn explanation(self) -> &'static str {
        match self {
            Self::EvaluateConstant => "Operations between numbers are computed.",
            Self::EvaluateFunction => "A function applied to a number with an exact value is computed.",
            Self::AddZero => "Adding zero does not change a value.",
            Self::SubtractZero => "Subtracting zero does not change a value, and subtracting from zero negates it.",
            Self::MultiplyZero => "Any product with a factor of zero is zero.",
            Self::MultiplyOne => "Multiplying or dividing by one does not change a value.",
            Self::CombineNumericFactors => "The numeric factors of a product are multiplied into a single coefficient.",
            Self::SubtractNegative => "Adding a negative term is written as a subtraction.",
            Self::CombineLikeTerms => "Terms with the same factors are added by adding their coefficients.",
            Self::SimplifyFraction => "Common factors of the numerator and denominator cancel.",
            Self::FactorCommonTerm => "A factor shared by every term is pulled out of the sum.",
            Self::ExpandProduct => "Multiplication is distributed over addition.",
            Self::PythagoreanIdentity => "sin(u)^2 + cos(u)^2 = 1.",
            Self::TrigParity => "sin and tan are odd functions, and cos is even.",
            Self::TrigExactValue => "The function has a known exact value at this multiple of pi.",
            Self::PowerZero => "Any value raised to the power of zero is one.",
            Self::PowerOne => "Any value raised to the power of one is itself.",
            Self::PowerOfOne => "One raised to any power is one.",
            Self::PowerOfZero => "Zero raised to a positive power is zero.",
            Self::PowerOfPower => "(a^b)^c = a^(b*c).",
            Self::CombineLikeFactors => "Powers with the same base are multiplied by adding their exponents.",
            Self::ExpProduct => "exp(a)*exp(b) = exp(a + b).",
            Self::ExpOfLn => "The exponential function undoes the natural logarithm.",
            Self::SqrtSquared => "Squaring a square root gives back its argument.",
            Self::SqrtOfSquare => "The square root of a square is the absolute value.",
            Self::LnOfOne => "The logarithm of one is zero.",
            Self::LnOfBase => "The logarithm of its own base is one.",
            Self::LnOfExp => "The natural logarithm undoes the exponential function.",
            Self::LogSum => "ln(a) + ln(b) = ln(a*b).",
            Self::LogDifference => "ln(a) - ln(b) = ln(a/b).",
            Self::LogOfPower => "ln(a^n) = n*ln(a).",
            Self::ConstantRule => "The derivative of a constant is zero.",
            Self::SumRule => "The derivative of a sum is the sum of the derivatives.",
            Self::DifferenceRule => "The derivative of a difference is the difference of the derivatives.",
            Self::ProductRule => "(f*g)' = f'*g + f*g'.",
            Self::QuotientRule => "(f/g)' = (f'*g - f*g')/g^2.",
            Self::PowerRule => "(u^n)' = n*u^(n - 1)*u'.",
            Self::ExponentialRule => "(a^u)' = a^u*ln(a)*u'.",
            Self::GeneralPowerRule => "(f^g)' = f^g*(g'*ln(f) + g*f'/f).",
            Self::ChainRule => "The derivative of f(u) is f'(u) times the derivative of u.",
            Self::FundamentalTheorem => "Differentiating an integral gives back its integrand.",
            Self::IntegrateConstant => "The integral of a constant c is c*x.",
            Self::IntegratePower => "The integral of x^n is x^(n + 1)/(n + 1) for n != -1.",
            Self::IntegrateReciprocal => "The integral of 1/x is ln(x).",
            Self::IntegrateSum => "The integral of a sum is the sum of the integrals.",
            Self::ConstantMultiple => "Constant factors can be moved outside of the integral.",
            Self::IntegrateFunction => "The function has a known antiderivative.",
            Self::LinearSubstitution => "The argument is linear, so the antiderivative is divided by its slope.",
            Self::IntegrationConstant => "An indefinite integral is only known up to a constant.",
            Self::EvaluateBounds => "The antiderivative is evaluated at the upper and lower bounds and subtracted.",
            Self::Unevaluated => "No integration rule applies, so the integral is left unevaluated.",
            Self::Normalize => "All terms are moved to one side of the equation and simplified.",
            Self::LinearFormula => "A linear equation a*x + b = 0 has the solution x = -b/a.",
            Self::QuadraticFormula => "x = (-b +- sqrt(b^2 - 4ac))/(2a).",
            Self::NumericRoots => "The real roots are located by sign changes and refined by bisection.",
            Self::GaussianElimination => "The linear system is reduced with partial pivoting and solved by back substitution.",
            Self::TaylorTerm => "The n-th term is f^(n)(c)/n! * (x - c)^n.",
            Self::TaylorRemainder => "The first omitted term estimates the error of the expansion.",
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.name())
    }
}

/// A single transformation applied to an expression.
///
/// The `before` and `after` trees are the part of the expression that the rule rewrote, not the
/// whole expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    /// The 1-based position of this step in its log. Assigned when the step is collected.
    pub index: u32,

    /// The operation that produced this step.
    pub operation: Operation,

    /// The expression before the rule was applied.
    pub before: AstNode,

    /// The expression after the rule was applied.
    pub after: AstNode,

    /// The rule that was applied.
    pub rule: Rule,

    /// A human-readable explanation of the step.
    pub explanation: String,
}

impl Step {
    /// Creates a new step, using the default explanation of the rule.
    pub fn new(operation: Operation, rule: Rule, before: &AstNode, after: &AstNode) -> Self {
        Self {
            index: 0,
            operation,
            before: before.clone(),
            after: after.clone(),
            rule,
            explanation: rule.explanation().to_owned(),
        }
    }

    /// Creates a new [`Operation::Simplify`] step.
    pub fn simplify(rule: Rule, before: &AstNode, after: &AstNode) -> Self {
        Self::new(Operation::Simplify, rule, before, after)
    }

    /// Replaces the explanation of this step.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}. [{}] {} => {} ({})", self.index, self.rule, self.before, self.after, self.explanation)
    }
}
