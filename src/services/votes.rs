use sqlx::PgPool;
use thiserror::Error;
use time::PrimitiveDateTime;

use crate::db::types::VoteDirection;
use crate::repositories;

/// The two kinds of entity a vote can land on. Each has its own ledger
/// table and denormalized counters on the parent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VoteSubject {
    Question,
    Answer,
}

impl VoteSubject {
    pub(crate) fn subject_table(self) -> &'static str {
        match self {
            Self::Question => "questions",
            Self::Answer => "answers",
        }
    }

    pub(crate) fn vote_table(self) -> &'static str {
        match self {
            Self::Question => "question_votes",
            Self::Answer => "answer_votes",
        }
    }

    pub(crate) fn subject_column(self) -> &'static str {
        match self {
            Self::Question => "question_id",
            Self::Answer => "answer_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VoteTransition {
    Create(VoteDirection),
    Remove(VoteDirection),
    Switch { from: VoteDirection, to: VoteDirection },
}

impl VoteTransition {
    /// The direction the user holds after the transition, if any.
    pub(crate) fn resulting_direction(self) -> Option<VoteDirection> {
        match self {
            Self::Create(direction) => Some(direction),
            Self::Switch { to, .. } => Some(to),
            Self::Remove(_) => None,
        }
    }
}

/// Decides what a repeated vote means: first vote creates, same direction
/// toggles off, opposite direction switches.
pub(crate) fn transition(
    existing: Option<VoteDirection>,
    requested: VoteDirection,
) -> VoteTransition {
    match existing {
        None => VoteTransition::Create(requested),
        Some(current) if current == requested => VoteTransition::Remove(current),
        Some(current) => VoteTransition::Switch { from: current, to: requested },
    }
}

/// Per-direction counter deltas (up, down) a transition applies to the
/// subject row. A switch carries both deltas so the counters move in one
/// statement.
pub(crate) fn counter_deltas(transition: VoteTransition) -> (i32, i32) {
    match transition {
        VoteTransition::Create(VoteDirection::Up) => (1, 0),
        VoteTransition::Create(VoteDirection::Down) => (0, 1),
        VoteTransition::Remove(VoteDirection::Up) => (-1, 0),
        VoteTransition::Remove(VoteDirection::Down) => (0, -1),
        VoteTransition::Switch { from: VoteDirection::Up, to: VoteDirection::Down } => (-1, 1),
        VoteTransition::Switch { from: VoteDirection::Down, to: VoteDirection::Up } => (1, -1),
        VoteTransition::Switch { .. } => (0, 0),
    }
}

#[derive(Debug, Error)]
pub(crate) enum VoteError {
    #[error("vote subject not found")]
    SubjectNotFound,
    #[error("vote already recorded")]
    AlreadyVoted,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Debug)]
pub(crate) struct VoteOutcome {
    pub(crate) up_votes: i32,
    pub(crate) down_votes: i32,
    pub(crate) voted: Option<VoteDirection>,
    pub(crate) author_id: String,
    pub(crate) created: bool,
}

/// Applies one user's vote on one subject inside a single transaction.
///
/// Invariant on commit: 0 or 1 ledger rows exist for (subject, user) and
/// the subject's counters equal the true per-direction row counts. The
/// counter move is an atomic `up_votes = up_votes + delta` update, never a
/// read-modify-write, so concurrent voters on the same subject cannot lose
/// updates. A concurrent duplicate insert trips the ledger primary key and
/// surfaces as `AlreadyVoted`.
pub(crate) async fn cast_vote(
    pool: &PgPool,
    subject: VoteSubject,
    subject_id: &str,
    user_id: &str,
    requested: VoteDirection,
    now: PrimitiveDateTime,
) -> Result<VoteOutcome, VoteError> {
    let mut tx = pool.begin().await?;

    let author_id = repositories::votes::subject_author(&mut tx, subject, subject_id)
        .await?
        .ok_or(VoteError::SubjectNotFound)?;

    let existing =
        repositories::votes::find_direction_for_update(&mut tx, subject, subject_id, user_id)
            .await?;
    let transition = transition(existing, requested);

    match transition {
        VoteTransition::Create(direction) => {
            repositories::votes::insert(&mut tx, subject, subject_id, user_id, direction, now)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        VoteError::AlreadyVoted
                    } else {
                        VoteError::Db(err)
                    }
                })?;
        }
        VoteTransition::Remove(_) => {
            repositories::votes::delete(&mut tx, subject, subject_id, user_id).await?;
        }
        VoteTransition::Switch { to, .. } => {
            repositories::votes::set_direction(&mut tx, subject, subject_id, user_id, to).await?;
        }
    }

    let (up_delta, down_delta) = counter_deltas(transition);
    let (up_votes, down_votes) = repositories::votes::apply_counter_deltas(
        &mut tx, subject, subject_id, up_delta, down_delta, now,
    )
    .await?;

    tx.commit().await?;

    Ok(VoteOutcome {
        up_votes,
        down_votes,
        voted: transition.resulting_direction(),
        author_id,
        created: matches!(transition, VoteTransition::Create(_)),
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::VoteDirection::{Down, Up};

    #[test]
    fn first_vote_creates() {
        assert_eq!(transition(None, Up), VoteTransition::Create(Up));
        assert_eq!(transition(None, Down), VoteTransition::Create(Down));
    }

    #[test]
    fn repeated_direction_toggles_off() {
        assert_eq!(transition(Some(Up), Up), VoteTransition::Remove(Up));
        assert_eq!(transition(Some(Down), Down), VoteTransition::Remove(Down));
    }

    #[test]
    fn opposite_direction_switches() {
        assert_eq!(transition(Some(Up), Down), VoteTransition::Switch { from: Up, to: Down });
        assert_eq!(transition(Some(Down), Up), VoteTransition::Switch { from: Down, to: Up });
    }

    #[test]
    fn toggle_is_net_zero_on_counters() {
        let (cu, cd) = counter_deltas(transition(None, Up));
        let (ru, rd) = counter_deltas(transition(Some(Up), Up));
        assert_eq!((cu + ru, cd + rd), (0, 0));
    }

    #[test]
    fn switch_moves_both_counters_in_one_step() {
        assert_eq!(counter_deltas(VoteTransition::Switch { from: Up, to: Down }), (-1, 1));
        assert_eq!(counter_deltas(VoteTransition::Switch { from: Down, to: Up }), (1, -1));
    }

    #[test]
    fn resulting_direction_tracks_the_held_vote() {
        assert_eq!(VoteTransition::Create(Up).resulting_direction(), Some(Up));
        assert_eq!(
            VoteTransition::Switch { from: Up, to: Down }.resulting_direction(),
            Some(Down)
        );
        assert_eq!(VoteTransition::Remove(Down).resulting_direction(), None);
    }
}
