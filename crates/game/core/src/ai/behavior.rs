use crate::state::{ActorId, Position, World};

/// Static behavior selected by creature configuration.
///
/// The [`super::goals::Bored`] fallback dispatches on this value whenever
/// an actor has nothing better to do.
#[derive(Clone, Debug, Default, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorKind {
    /// Stands still and only fights what comes adjacent.
    #[default]
    Idle,
    /// Wanders around and hunts hostiles it sees.
    Wanderer,
    /// Walks a fixed route of waypoints.
    Patrol { route: Vec<Position> },
    /// Stays close to a leader and protects it.
    FollowLeader {
        #[cfg_attr(feature = "serde", serde(default))]
        leader: Option<ActorId>,
    },
    /// Keeps its distance and shoots.
    Skirmisher,
    /// Runs from every hostile.
    Coward,
    /// Collects items lying around.
    Scavenger,
}

/// Behavior configuration that cannot be honoured.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BehaviorError {
    #[error("patrol route is empty")]
    EmptyRoute,

    #[error("follow-leader behavior has no leader")]
    MissingLeader,

    #[error("leader {0} does not exist")]
    UnknownLeader(ActorId),

    #[error("actor cannot follow itself")]
    SelfLeader,
}

impl BehaviorKind {
    pub fn label(&self) -> &'static str {
        self.into()
    }

    /// Checks references to other actors and routes for an actor about to
    /// be spawned as `id`.
    pub fn validate(&self, id: ActorId, world: &World) -> Result<(), BehaviorError> {
        match self {
            BehaviorKind::Patrol { route } if route.is_empty() => Err(BehaviorError::EmptyRoute),
            BehaviorKind::FollowLeader { leader: None } => Err(BehaviorError::MissingLeader),
            BehaviorKind::FollowLeader {
                leader: Some(leader),
            } => {
                if *leader == id {
                    Err(BehaviorError::SelfLeader)
                } else if !world.is_valid(*leader) {
                    Err(BehaviorError::UnknownLeader(*leader))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}
