//! Simplification rules that work on whole sums and fractions: combining like terms, cancelling
//! common factors, and the factoring and expanding rules used to reach a target form.

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::symbolic::{
    coeff::Coeff,
    simplify::{options::{Domain, TargetForm}, rules::do_sum},
    step::{Rule, Step},
    step_collector::StepCollector,
    term::{build_product, build_sum, sum_terms, Term},
};

/// Products and powers of sums are only expanded up to this exponent.
const MAX_EXPANSION_POWER: f64 = 6.0;

/// Splits a factor into its base and numeric exponent. Factors with a symbolic exponent are
/// treated as a base raised to `1`.
fn numeric_power(node: &AstNode) -> (&AstNode, f64) {
    match node.as_op(BinOpKind::Exp) {
        Some((base, exp)) => match exp.as_number() {
            Some(exp) => (base, exp),
            None => (node, 1.0),
        },
        None => (node, 1.0),
    }
}

/// Builds `base^exp`, leaving out an exponent of `1`.
fn make_power(base: &AstNode, exp: f64) -> AstNode {
    if exp == 1.0 {
        base.clone()
    } else {
        AstNode::pow(base.clone(), AstNode::num(exp))
    }
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `a/3 + a/6 = a/2`
/// etc.
pub fn combine_like_terms(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_sum(node, |terms| {
        let mut combined: Vec<Term> = Vec::with_capacity(terms.len());
        for term in &terms {
            match combined.iter_mut().find(|existing| existing.has_same_factors(term)) {
                Some(existing) => existing.coeff = existing.coeff.add(term.coeff),
                None => combined.push(term.clone()),
            }
        }
        combined.retain(|term| !term.coeff.is_zero());

        (combined.len() < terms.len()).then(|| build_sum(&combined))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::simplify(Rule::CombineLikeTerms, node, &opt));
    Some(opt)
}

/// Returns true if the product / quotient chain rooted at this node contains a division.
fn contains_division(node: &AstNode) -> bool {
    match node {
        AstNode::Operator(BinOpKind::Div, _, _) => true,
        AstNode::Operator(BinOpKind::Mul, lhs, rhs) => contains_division(lhs) || contains_division(rhs),
        _ => false,
    }
}

/// Cancels factors that appear in both the numerator and denominator of the term. Powers of the
/// same base with numeric exponents cancel partially.
fn cancel_factors(term: &mut Term) {
    'outer: loop {
        for i in 0..term.num.len() {
            let (num_base, num_exp) = numeric_power(&term.num[i]);
            for j in 0..term.den.len() {
                let (den_base, den_exp) = numeric_power(&term.den[j]);
                if num_base != den_base {
                    continue;
                }

                let base = num_base.clone();
                let diff = num_exp - den_exp;
                term.num.remove(i);
                term.den.remove(j);
                if diff > 0.0 {
                    term.num.push(make_power(&base, diff));
                } else if diff < 0.0 {
                    term.den.push(make_power(&base, -diff));
                }
                continue 'outer;
            }
        }
        break;
    }
}

/// Reduces a fraction: the numeric coefficient is reduced to lowest terms, and equal factors of
/// the numerator and denominator cancel.
///
/// `2x/4 = x/2`
/// `x^3/x = x^2`
/// `(x*y)/(y*z) = x/z`
pub fn simplify_fractions(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    if !contains_division(node) {
        return None;
    }

    let mut term = Term::from_node(node)?;
    cancel_factors(&mut term);
    let opt = term.to_node();
    if opt == *node {
        return None;
    }

    step_collector.push(Step::simplify(Rule::SimplifyFraction, node, &opt));
    Some(opt)
}

/// Computes the greatest common divisor of two integers.
fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Pulls the numeric and symbolic factors shared by every term out of a sum.
///
/// `2x + 4 = 2(x + 2)`
/// `x^2 + x = x(x + 1)`
pub fn factor_common_term(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_sum(node, |mut terms| {
        if terms.len() < 2 || terms.iter().any(|term| !term.den.is_empty()) {
            return None;
        }

        // the greatest common divisor of the coefficients, if they are all integers
        let divisor = terms.iter()
            .map(|term| term.coeff.as_integer())
            .try_fold(0, |acc, n| Some(gcd(acc, n?)))
            .filter(|divisor| *divisor > 1)
            .unwrap_or(1);

        // factors of the first term that appear in every other term, with the smallest exponent
        let common = terms[0].num.iter()
            .filter_map(|factor| {
                let (base, first_exp) = numeric_power(factor);
                terms[1..].iter().try_fold(first_exp, |min_exp, term| {
                    term.num.iter()
                        .map(|other| numeric_power(other))
                        .find(|(other_base, _)| *other_base == base)
                        .map(|(_, exp)| exp.min(min_exp))
                })
                    .filter(|exp| *exp > 0.0)
                    .map(|exp| (base.clone(), exp))
            })
            .collect::<Vec<_>>();

        if divisor == 1 && common.is_empty() {
            return None;
        }

        for term in &mut terms {
            term.coeff = term.coeff.div(Coeff::integer(divisor))?;
            for (base, exp) in &common {
                let index = term.num.iter().position(|factor| numeric_power(factor).0 == base)?;
                let remaining = numeric_power(&term.num[index]).1 - exp;
                if remaining == 0.0 {
                    term.num.remove(index);
                } else {
                    term.num[index] = make_power(base, remaining);
                }
            }
        }

        let factor = build_product(
            (divisor != 1).then(|| AstNode::num(divisor as f64))
                .into_iter()
                .chain(common.iter().map(|(base, exp)| make_power(base, *exp)))
        );
        Some(AstNode::mul(factor, build_sum(&terms)))
    })?;

    step_collector.push(Step::simplify(Rule::FactorCommonTerm, node, &opt));
    Some(opt)
}

/// Multiplies two sums term by term.
fn multiply_terms(lhs: &[Term], rhs: &[Term]) -> Vec<Term> {
    lhs.iter()
        .flat_map(|a| rhs.iter().map(move |b| Term {
            coeff: a.coeff.mul(b.coeff),
            num: a.num.iter().chain(&b.num).cloned().collect(),
            den: a.den.iter().chain(&b.den).cloned().collect(),
        }))
        .collect()
}

/// Returns true if the node is a sum or difference.
fn is_sum(node: &AstNode) -> bool {
    matches!(node, AstNode::Operator(BinOpKind::Add | BinOpKind::Sub, _, _))
}

/// Distributes multiplication over addition, and expands small integer powers of sums.
///
/// `a(b + c) = ab + ac`
/// `(a + b)^2 = aa + ab + ba + bb`
pub fn expand_products(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let terms = match node {
        AstNode::Operator(BinOpKind::Mul, lhs, rhs) if is_sum(lhs) || is_sum(rhs) => {
            multiply_terms(&sum_terms(lhs)?, &sum_terms(rhs)?)
        },
        AstNode::Operator(BinOpKind::Exp, base, exp) if is_sum(base) => {
            let exp = exp.as_number().filter(|n| n.fract() == 0.0 && (2.0..=MAX_EXPANSION_POWER).contains(n))?;
            let base = sum_terms(base)?;
            (1..exp as usize).fold(base.clone(), |acc, _| multiply_terms(&acc, &base))
        },
        _ => return None,
    };

    let opt = build_sum(&terms);
    step_collector.push(Step::simplify(Rule::ExpandProduct, node, &opt));
    Some(opt)
}

/// Applies the regular rules.
pub fn all(node: &AstNode, _: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    combine_like_terms(node, step_collector)
        .or_else(|| simplify_fractions(node, step_collector))
}

/// Applies the rule that brings the expression into the given form, if any.
pub fn target(node: &AstNode, form: TargetForm, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    match form {
        TargetForm::Simplified => None,
        TargetForm::Expanded => expand_products(node, step_collector),
        TargetForm::Factored => factor_common_term(node, step_collector),
    }
}
