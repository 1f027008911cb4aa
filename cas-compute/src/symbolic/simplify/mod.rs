//! Rule-based simplification of expressions.
//!
//! The simplifier visits the tree bottom-up, applying each category of [`rules`] in a fixed order:
//! arithmetic, algebraic, trigonometric, exponential, then logarithmic. One such sweep is a
//! _pass_. Passes are repeated until the tree stops changing (a fixpoint), or until the budget in
//! [`SimplifyOptions::max_steps`] runs out, in which case the current tree is returned as-is.
//! Simplification never fails.

pub mod options;
pub mod rules;

pub use options::{Domain, SimplifyOptions, SimplifyOptionsBuilder, TargetForm};

use cas_parser::parser::ast::AstNode;
use rules::{algebraic, arithmetic, exponential, logarithmic, trigonometry, Category};
use super::{step::Step, step_collector::StepCollector};
use tracing::{debug, trace, warn};

/// The categories of rules, in the order they are applied during a pass.
pub const CATEGORIES: [(&str, Category); 5] = [
    ("arithmetic", arithmetic::all),
    ("algebraic", algebraic::all),
    ("trigonometric", trigonometry::all),
    ("exponential", exponential::all),
    ("logarithmic", logarithmic::all),
];

/// Applies the category to every node of the tree, children first.
///
/// A rule that produces a node equal to its input is treated as not applying, and its steps are
/// dropped.
fn apply_category(
    node: &AstNode,
    category: impl Fn(&AstNode, &mut dyn StepCollector<Step>) -> Option<AstNode> + Copy,
    step_collector: &mut dyn StepCollector<Step>,
) -> AstNode {
    let node = node.map_children(|child| apply_category(child, category, step_collector));

    let mut local = Vec::new();
    match category(&node, &mut local) {
        Some(out) if out != node => {
            trace!(before = %node, after = %out, "rewrite");
            local.into_iter().for_each(|step| step_collector.push(step));
            out
        },
        _ => node,
    }
}

/// Runs passes of the regular rules until a fixpoint is reached, or the budget runs out. Returns
/// the new tree and whether a fixpoint was reached.
fn run_regular(
    mut node: AstNode,
    domain: Domain,
    budget: &mut usize,
    step_collector: &mut dyn StepCollector<Step>,
) -> (AstNode, bool) {
    while *budget > 0 {
        *budget -= 1;
        let before = node.clone();
        for (name, category) in CATEGORIES {
            node = apply_category(&node, |node, steps| category(node, domain, steps), step_collector);
            trace!(category = name, tree = %node, "category applied");
        }

        debug!(pass = %node, remaining = *budget, "simplifier pass");
        if node == before {
            debug!(result = %node, "fixpoint reached");
            return (node, true);
        }
    }
    (node, false)
}

/// Runs passes of the expansion or factoring rule until it no longer applies, or the budget runs
/// out.
fn run_target(
    mut node: AstNode,
    form: TargetForm,
    budget: &mut usize,
    step_collector: &mut dyn StepCollector<Step>,
) -> AstNode {
    while *budget > 0 {
        *budget -= 1;
        let before = node.clone();
        node = apply_category(&node, |node, steps| algebraic::target(node, form, steps), step_collector);
        debug!(pass = %node, form = ?form, "target form pass");
        if node == before {
            break;
        }
    }
    node
}

/// Simplifies the given expression using the default options.
pub fn simplify(node: &AstNode) -> AstNode {
    simplify_with(node, &SimplifyOptions::default())
}

/// Simplifies the given expression using the given options.
pub fn simplify_with(node: &AstNode, options: &SimplifyOptions) -> AstNode {
    simplify_with_steps(node, options, &mut ())
}

/// Simplifies the given expression using the given options, recording every rule application in
/// the given step collector.
pub fn simplify_with_steps(
    node: &AstNode,
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> AstNode {
    let mut budget = options.max_steps;
    let (mut node, mut fixpoint) = run_regular(node.clone(), options.domain, &mut budget, step_collector);

    if options.target_form != TargetForm::Simplified {
        let target = run_target(node.clone(), options.target_form, &mut budget, step_collector);
        if target != node {
            (node, fixpoint) = run_regular(target, options.domain, &mut budget, step_collector);
        }
    }

    if !fixpoint {
        warn!(max_steps = options.max_steps, result = %node, "simplification budget exhausted before reaching a fixpoint");
    }
    node
}

#[cfg(test)]
mod tests {
    use cas_parser::parse_expression;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> AstNode {
        parse_expression(source).ast.unwrap()
    }

    fn simplified(source: &str) -> String {
        simplify(&parse(source)).to_string()
    }

    fn simplified_with(source: &str, options: SimplifyOptions) -> String {
        simplify_with(&parse(source), &options).to_string()
    }

    #[test]
    fn like_terms() {
        assert_eq!(simplified("x + x + x"), "3*x");
        assert_eq!(simplified("2x + 3x - x"), "4*x");
        assert_eq!(simplified("x - x"), "0");
    }

    #[test]
    fn constants_and_identities() {
        assert_eq!(simplified("2 + 3 * 4"), "14");
        assert_eq!(simplified("0 * x + 1 * y"), "y");
        assert_eq!(simplified("x^1 + y^0"), "x + 1");
        assert_eq!(simplified("sin(x)^2 + cos(x)^2"), "1");
        assert_eq!(simplified("ln(e^x)"), "x");
        assert_eq!(simplified("sin(pi/6)"), "1/2");
    }

    #[test]
    fn powers_collect() {
        assert_eq!(simplified("x * x"), "x^2");
        assert_eq!(simplified("x^3/x"), "x^2");
    }

    #[test]
    fn idempotent() {
        for source in [
            "x + x + x",
            "2x^2*y*x^3",
            "(x + 1)*(x - 1)",
            "sin(x)^2 + cos(x)^2 + ln(x) - ln(y)",
            "3x/6 + exp(a)*exp(b)",
            "sqrt(x^2) + 0*y",
        ] {
            let once = simplify(&parse(source));
            let twice = simplify(&once);
            assert_eq!(once, twice, "simplifying `{}` twice changed the result", source);
        }
    }

    #[test]
    fn steps_are_numbered() {
        let mut steps = Vec::new();
        let out = simplify_with_steps(&parse("x + x + 0"), &SimplifyOptions::default(), &mut steps);
        assert_eq!(out.to_string(), "2*x");
        assert!(!steps.is_empty());
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.index as usize, i + 1);
            assert_ne!(step.before, step.after);
        }
    }

    #[test]
    fn expanded_form() {
        let options = TargetForm::Expanded.inside(SimplifyOptions::default());
        assert_eq!(simplified_with("(x + 1)^2", options), "x^2 + 2*x + 1");
        assert_eq!(simplified_with("(x + 1)*(x - 1)", options), "x^2 - 1");
    }

    #[test]
    fn factored_form() {
        let options = TargetForm::Factored.inside(SimplifyOptions::default());
        assert_eq!(simplified_with("2x + 4", options), "2*(x + 2)");
    }

    #[test]
    fn positive_domain() {
        assert_eq!(simplified("sqrt(x^2)"), "abs(x)");
        let options = Domain::Positive.inside(SimplifyOptions::default());
        assert_eq!(simplified_with("sqrt(x^2)", options), "x");
    }

    #[test]
    fn budget_stops_early() {
        // RUST_LOG=cas_compute=debug shows each pass
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let options = SimplifyOptionsBuilder::new().max_steps(0).build();
        assert_eq!(simplified_with("x + x", options), "x + x");
    }
}
