use crate::config::Thresholds;
use crate::field::PositionedField;
use crate::filter::Filter;
use crate::matching::{candidates, classify, MatchKind, MatchOutcome};

/// Classification of every option of a select question
pub(super) struct OptionMatches {
    pub filtered: Vec<PositionedField>,
    pub outcomes: Vec<MatchOutcome>,
}

impl OptionMatches {
    /// Each option runs the full cascade on its own against the same filtered pool
    pub fn classify(
        options: &[String],
        filter: &Filter,
        pool: &[PositionedField],
        thresholds: &Thresholds,
    ) -> Self {
        let filtered = filter.apply(pool);
        let candidates = candidates(&filtered, thresholds);
        let outcomes: Vec<MatchOutcome> = options
            .iter()
            .map(|option| classify(option, &candidates, thresholds))
            .collect();

        tracing::trace!(?options, ?outcomes, "classified select options");

        Self { filtered, outcomes }
    }

    pub fn position(&self, kind: MatchKind) -> Option<usize> {
        self.outcomes.iter().position(|o| o.kind == kind)
    }

    pub fn missing(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_found()).count()
    }

    pub fn any_selected(&self) -> bool {
        self.outcomes.iter().any(|o| o.kind.is_selected())
    }
}
