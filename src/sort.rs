use k8s_openapi::jiff::Timestamp;
use std::cmp::Reverse;

use crate::model::{PhaseLabel, PodSummary};
use crate::status::phase_of;

// Running pods first, oldest start first and unknown starts last; then
// everything else, newest creation first.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
enum Rank {
    Running { start_unknown: bool, started_at: Option<Timestamp> },
    Other(Reverse<Option<Timestamp>>),
}

fn rank(pod: &PodSummary) -> Rank {
    if phase_of(pod) == PhaseLabel::Running {
        Rank::Running {
            start_unknown: pod.started_at.is_none(),
            started_at: pod.started_at,
        }
    } else {
        Rank::Other(Reverse(pod.created_at))
    }
}

pub fn sort_pods(pods: &mut [PodSummary]) {
    pods.sort_by_cached_key(rank);
}
