use std::collections::BTreeSet;

use crate::models::snapshot::{fields, FormSnapshot};

/// Place-of-work answers that change which steps appear.
pub const PLACE_LABORATORY: &str = "laboratory";
pub const PLACE_ABATTOIR: &str = "abattoir";

/// Stable identifier of one wizard page. Indices shift as the step list
/// is refiltered; ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    Intro,
    General,
    Animal,
    Clinical,
    Lab,
    Control,
    Referral,
    Postmortem,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Intro => "intro",
            StepId::General => "general",
            StepId::Animal => "animal",
            StepId::Clinical => "clinical",
            StepId::Lab => "lab",
            StepId::Control => "control",
            StepId::Referral => "referral",
            StepId::Postmortem => "postmortem",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepId::Intro => "Introduction",
            StepId::General => "General Case Info",
            StepId::Animal => "Animal Information",
            StepId::Clinical => "Clinical & Classification",
            StepId::Lab => "Lab & Diagnostics",
            StepId::Control => "Control Measures",
            StepId::Referral => "Sample Referral",
            StepId::Postmortem => "Post Mortem Lesions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub label: &'static str,
}

impl Step {
    fn new(id: StepId) -> Self {
        Self { id, label: id.label() }
    }
}

/// The active step sequence for the given snapshot.
///
/// Lab officers get the lab step instead of the referral step; abattoir
/// and lab officers additionally get the post-mortem step. The relative
/// order is fixed: intro, general, animal, clinical, [lab], control,
/// [referral], [postmortem].
pub fn compute_steps(snapshot: &FormSnapshot) -> Vec<Step> {
    let place = snapshot.text(fields::PLACE_OF_WORK).unwrap_or_default();

    let mut steps = vec![
        Step::new(StepId::Intro),
        Step::new(StepId::General),
        Step::new(StepId::Animal),
        Step::new(StepId::Clinical),
    ];

    if place == PLACE_LABORATORY {
        steps.push(Step::new(StepId::Lab));
    }

    steps.push(Step::new(StepId::Control));

    if place != PLACE_LABORATORY {
        steps.push(Step::new(StepId::Referral));
    }

    if place == PLACE_ABATTOIR || place == PLACE_LABORATORY {
        steps.push(Step::new(StepId::Postmortem));
    }

    steps
}

/// A step is unlocked when it is the first step, when its predecessor has
/// been completed, or when the officer is already past it.
pub fn is_unlocked(
    target: usize,
    current: usize,
    steps: &[Step],
    completed: &BTreeSet<StepId>,
) -> bool {
    target == 0
        || steps
            .get(target - 1)
            .is_some_and(|prev| completed.contains(&prev.id))
        || current > target
}
