use crate::client::EnrollmentApi;
use crate::control::{CourseId, EnrollmentState};
use crate::errors::{ErrorKind, ToggleError};
use crate::notice::NoticeBoard;
use crate::page::{Begin, Page};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// A user-initiated trigger of one control.
#[derive(Debug, Clone)]
pub struct ActivationEvent {
    pub course_id: CourseId,
    default_prevented: bool,
}

impl ActivationEvent {
    pub fn new(course_id: CourseId) -> Self {
        Self {
            course_id,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Toggled {
        from: EnrollmentState,
        to: EnrollmentState,
    },
    Failed {
        kind: ErrorKind,
    },
    /// A request for this control is still in flight.
    Busy,
    Unbound,
}

pub struct EnrollmentToggleHandler<A> {
    api: A,
    notices: NoticeBoard,
}

impl<A: EnrollmentApi> EnrollmentToggleHandler<A> {
    pub fn new(api: A, notices: NoticeBoard) -> Self {
        Self { api, notices }
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Runs one activation to completion. Remote failures are absorbed here:
    /// the control stays as it was and exactly one notice is raised. Dropping
    /// the future midway releases the control without changing its state.
    pub async fn handle(&self, page: &Page, event: &mut ActivationEvent) -> Outcome {
        event.prevent_default();
        let course_id = &event.course_id;

        let transition = match page.begin(course_id).await {
            Begin::Started(transition) => transition,
            Begin::Busy => {
                debug!(%course_id, "activation ignored while request in flight");
                return Outcome::Busy;
            }
            Begin::Unbound => {
                warn!(%course_id, "activation on unbound control");
                return Outcome::Unbound;
            }
        };
        let in_flight = page.in_flight(course_id);

        match self.api.send(transition.action, course_id).await {
            Ok(()) => {
                in_flight.complete(Some(transition.next)).await;
                info!(%course_id, action = %transition.action, state = ?transition.next, "enrollment toggled");
                Outcome::Toggled {
                    from: transition.next.toggled(),
                    to: transition.next,
                }
            }
            Err(err) => {
                in_flight.complete(None).await;
                report(course_id, &err);
                self.notices.raise(course_id, &err).await;
                Outcome::Failed { kind: err.kind() }
            }
        }
    }
}

fn report(course_id: &CourseId, err: &ToggleError) {
    let kind = err.kind().as_str();
    match err {
        ToggleError::RemoteRejected { action, status } => {
            warn!(%course_id, %action, status, kind, "server rejected enrollment change");
        }
        _ => {
            error!(%course_id, kind, error = %err, "enrollment request failed");
        }
    }
}
