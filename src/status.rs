use ratatui::style::Color;

use crate::model::{ContainerState, HealthBucket, PhaseLabel, PodSummary};
use crate::paint::{StyledText, paint};

const IMAGE_PULL_BACK_OFF: &str = "ImagePullBackOff";

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Buckets<'a> {
    pub running: Vec<&'a ContainerState>,
    pub good: Vec<&'a ContainerState>,
    pub failed: Vec<&'a ContainerState>,
    pub waiting: Vec<&'a ContainerState>,
}

impl Buckets<'_> {
    pub fn phase(&self) -> PhaseLabel {
        if !self.running.is_empty() {
            PhaseLabel::Running
        } else if !self.waiting.is_empty() {
            PhaseLabel::Pending
        } else if !self.failed.is_empty() {
            PhaseLabel::Failed
        } else {
            PhaseLabel::Succeeded
        }
    }
}

// Rule order matters: an image pull back-off is a failure even though the
// container is still waiting.
pub fn bucket_of(state: &ContainerState) -> HealthBucket {
    match state {
        ContainerState::Waiting { reason } if reason == IMAGE_PULL_BACK_OFF => HealthBucket::Failed,
        ContainerState::Waiting { .. } => HealthBucket::Waiting,
        ContainerState::Running => HealthBucket::Running,
        ContainerState::Terminated { exit_code } if *exit_code != 0 => HealthBucket::Failed,
        ContainerState::Terminated { .. } | ContainerState::Unknown => HealthBucket::Good,
    }
}

pub fn classify(states: &[ContainerState]) -> Buckets<'_> {
    let mut buckets = Buckets::default();
    for state in states {
        match bucket_of(state) {
            HealthBucket::Running => buckets.running.push(state),
            HealthBucket::Good => buckets.good.push(state),
            HealthBucket::Failed => buckets.failed.push(state),
            HealthBucket::Waiting => buckets.waiting.push(state),
        }
    }
    buckets
}

pub fn phase_of(pod: &PodSummary) -> PhaseLabel {
    classify(&pod.containers).phase()
}

pub fn phase_color(phase: PhaseLabel) -> Color {
    match phase {
        PhaseLabel::Running => Color::Indexed(37),
        PhaseLabel::Pending => Color::Indexed(220),
        PhaseLabel::Succeeded => Color::Indexed(76),
        PhaseLabel::Failed => Color::Indexed(196),
        PhaseLabel::Unknown => Color::Indexed(240),
    }
}

pub fn paint_phase(phase: PhaseLabel) -> StyledText {
    paint(phase_color(phase), phase.as_str())
}

#[cfg(test)]
mod tests {
    use super::{Buckets, bucket_of, classify, paint_phase, phase_of};
    use crate::model::{ContainerState, HealthBucket, PhaseLabel, PodSummary};
    use ratatui::style::Color;

    fn waiting(reason: &str) -> ContainerState {
        ContainerState::Waiting {
            reason: reason.to_string(),
        }
    }

    fn exited(exit_code: i32) -> ContainerState {
        ContainerState::Terminated { exit_code }
    }

    fn pod_with(containers: Vec<ContainerState>) -> PodSummary {
        PodSummary {
            name: "web".to_string(),
            containers,
            ..PodSummary::default()
        }
    }

    #[test]
    fn image_pull_back_off_is_failed_not_waiting() {
        assert_eq!(bucket_of(&waiting("ImagePullBackOff")), HealthBucket::Failed);
        assert_eq!(bucket_of(&waiting("ContainerCreating")), HealthBucket::Waiting);
        assert_eq!(bucket_of(&waiting("")), HealthBucket::Waiting);
    }

    #[test]
    fn exit_codes_split_failed_from_good() {
        assert_eq!(bucket_of(&exited(0)), HealthBucket::Good);
        assert_eq!(bucket_of(&exited(137)), HealthBucket::Failed);
        assert_eq!(bucket_of(&exited(-1)), HealthBucket::Failed);
        assert_eq!(bucket_of(&ContainerState::Unknown), HealthBucket::Good);
        assert_eq!(bucket_of(&ContainerState::Running), HealthBucket::Running);
    }

    #[test]
    fn buckets_partition_every_state() {
        let states = vec![
            ContainerState::Running,
            waiting("ImagePullBackOff"),
            waiting("CrashLoopBackOff"),
            exited(0),
            exited(2),
            ContainerState::Unknown,
            ContainerState::Running,
        ];
        let buckets = classify(&states);
        let total = buckets.running.len()
            + buckets.waiting.len()
            + buckets.failed.len()
            + buckets.good.len();
        assert_eq!(total, states.len());
        assert_eq!(buckets.running.len(), 2);
        assert_eq!(buckets.waiting.len(), 1);
        assert_eq!(buckets.failed.len(), 2);
        assert_eq!(buckets.good.len(), 2);
        assert_eq!(classify(&[]), Buckets::default());
    }

    #[test]
    fn phase_follows_bucket_precedence() {
        let running_and_waiting = pod_with(vec![waiting("PodInitializing"), ContainerState::Running]);
        assert_eq!(phase_of(&running_and_waiting), PhaseLabel::Running);

        let waiting_and_failed = pod_with(vec![exited(1), waiting("ContainerCreating")]);
        assert_eq!(phase_of(&waiting_and_failed), PhaseLabel::Pending);

        let failed_and_good = pod_with(vec![exited(0), waiting("ImagePullBackOff")]);
        assert_eq!(phase_of(&failed_and_good), PhaseLabel::Failed);

        assert_eq!(phase_of(&pod_with(vec![exited(0)])), PhaseLabel::Succeeded);
        assert_eq!(phase_of(&pod_with(Vec::new())), PhaseLabel::Succeeded);
    }

    #[test]
    fn phases_render_with_fixed_colors() {
        assert_eq!(paint_phase(PhaseLabel::Failed).fg, Color::Indexed(196));
        assert_eq!(paint_phase(PhaseLabel::Unknown).fg, Color::Indexed(240));
        assert_eq!(paint_phase(PhaseLabel::Running).text, "Running");
        assert_eq!(paint_phase(PhaseLabel::Pending).bg, None);
    }
}
