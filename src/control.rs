use crate::errors::ToggleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque course identifier as rendered on the page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ToggleError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ToggleError::InvalidCourseId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentState {
    Enrolled,
    NotEnrolled,
}

impl EnrollmentState {
    pub fn from_enrolled(enrolled: bool) -> Self {
        if enrolled {
            EnrollmentState::Enrolled
        } else {
            EnrollmentState::NotEnrolled
        }
    }

    pub fn is_enrolled(self) -> bool {
        self == EnrollmentState::Enrolled
    }

    pub fn toggled(self) -> Self {
        match self {
            EnrollmentState::Enrolled => EnrollmentState::NotEnrolled,
            EnrollmentState::NotEnrolled => EnrollmentState::Enrolled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Enroll,
    Unenroll,
}

impl Action {
    /// Last path segment of the remote action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Enroll => "enroll",
            Action::Unenroll => "unenroll",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Action::Enroll => "Failed to enroll in course. Please try again.",
            Action::Unenroll => "Failed to unenroll from course. Please try again.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    pub next: EnrollmentState,
}

/// Picks the remote action for the current state and the state a successful
/// response leads to.
pub fn plan(state: EnrollmentState) -> Transition {
    let action = match state {
        EnrollmentState::Enrolled => Action::Unenroll,
        EnrollmentState::NotEnrolled => Action::Enroll,
    };
    Transition {
        action,
        next: state.toggled(),
    }
}

/// Visual marker of a control. Always derived from the typed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub classes: &'static [&'static str],
    pub icon: &'static str,
    pub label: &'static str,
}

pub const ENROLLED_CLASS: &str = "bg-green-600";

const ENROLLED_MARKER: Marker = Marker {
    classes: &[ENROLLED_CLASS, "hover:bg-green-700"],
    icon: "fa-user-check",
    label: "Enrolled",
};

const NOT_ENROLLED_MARKER: Marker = Marker {
    classes: &["bg-gray-500", "hover:bg-gray-600"],
    icon: "fa-user-plus",
    label: "Enroll",
};

impl Marker {
    pub fn for_state(state: EnrollmentState) -> Self {
        match state {
            EnrollmentState::Enrolled => ENROLLED_MARKER,
            EnrollmentState::NotEnrolled => NOT_ENROLLED_MARKER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub course_id: CourseId,
    pub state: EnrollmentState,
    pub pending: bool,
}

impl Control {
    pub fn new(course_id: CourseId, state: EnrollmentState) -> Self {
        Self {
            course_id,
            state,
            pending: false,
        }
    }

    pub fn marker(&self) -> Marker {
        Marker::for_state(self.state)
    }

    pub fn view(&self) -> ControlView {
        let marker = self.marker();
        ControlView {
            course_id: self.course_id.clone(),
            state: self.state,
            label: marker.label,
            classes: marker.classes.join(" "),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlView {
    pub course_id: CourseId,
    pub state: EnrollmentState,
    pub label: &'static str,
    pub classes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_maps_state_to_action() {
        let enroll = plan(EnrollmentState::NotEnrolled);
        assert_eq!(enroll.action, Action::Enroll);
        assert_eq!(enroll.next, EnrollmentState::Enrolled);

        let unenroll = plan(EnrollmentState::Enrolled);
        assert_eq!(unenroll.action, Action::Unenroll);
        assert_eq!(unenroll.next, EnrollmentState::NotEnrolled);
    }

    #[test]
    fn marker_follows_state() {
        let mut control = Control::new(CourseId::new("CS101").unwrap(), EnrollmentState::NotEnrolled);
        assert_eq!(control.marker().label, "Enroll");
        assert!(!control.marker().classes.contains(&ENROLLED_CLASS));

        control.state = control.state.toggled();
        assert_eq!(control.marker().label, "Enrolled");
        assert_eq!(control.view().classes, "bg-green-600 hover:bg-green-700");
    }

    #[test]
    fn course_id_rejects_blank() {
        assert!(matches!(CourseId::new("  "), Err(ToggleError::InvalidCourseId)));
        assert_eq!(CourseId::new("CS101").unwrap().as_str(), "CS101");
    }
}
