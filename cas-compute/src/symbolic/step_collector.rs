use super::step::Step;

/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`. This is useful when you don't
/// want to know the steps taken by an algorithm, such as when the solver simplifies intermediate
/// coefficients.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

/// Numbers each step by its position in the log, starting from 1.
impl StepCollector<Step> for Vec<Step> {
    #[inline]
    fn push(&mut self, mut step: Step) {
        step.index = self.len() as u32 + 1;
        Vec::push(self, step);
    }
}

#[cfg(test)]
mod tests {
    use cas_parser::parser::ast::AstNode;
    use super::*;
    use crate::symbolic::step::Rule;

    #[test]
    fn steps_are_numbered() {
        let mut steps = Vec::new();
        let (x, zero) = (AstNode::var("x"), AstNode::num(0.0));
        let collector: &mut dyn StepCollector<Step> = &mut steps;
        collector.push(Step::simplify(Rule::AddZero, &AstNode::add(x.clone(), zero.clone()), &x));
        collector.push(Step::simplify(Rule::MultiplyZero, &AstNode::mul(x.clone(), zero.clone()), &zero));
        assert_eq!(steps.iter().map(|step| step.index).collect::<Vec<_>>(), vec![1, 2]);

        let mut discard = ();
        StepCollector::<Step>::push(&mut discard, Step::simplify(Rule::AddZero, &x, &x));
    }
}
