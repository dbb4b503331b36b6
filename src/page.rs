use crate::control::{plan, Control, ControlView, CourseId, EnrollmentState, Transition, ENROLLED_CLASS};
use crate::ui::{unescape_html, CONTROL_CLASS};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Result of trying to start an activation on a bound control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    Started(Transition),
    Busy,
    Unbound,
}

/// Every control bound on a rendered page. Cloning shares the same controls.
#[derive(Debug, Clone, Default)]
pub struct Page {
    order: Arc<Vec<CourseId>>,
    controls: Arc<Mutex<BTreeMap<CourseId, Control>>>,
}

impl Page {
    pub fn from_controls(controls: impl IntoIterator<Item = Control>) -> Self {
        let mut order = Vec::new();
        let mut bound = BTreeMap::new();
        for control in controls {
            if bound.contains_key(&control.course_id) {
                warn!(course_id = %control.course_id, "duplicate control ignored");
                continue;
            }
            order.push(control.course_id.clone());
            bound.insert(control.course_id.clone(), control);
        }

        Self {
            order: Arc::new(order),
            controls: Arc::new(Mutex::new(bound)),
        }
    }

    /// Binds every control element found in rendered markup. The enrolled
    /// marker is read once here to seed the typed state.
    pub fn scan(html: &str) -> Self {
        let mut controls = Vec::new();
        for tag in html.split('<').skip(1) {
            let tag = tag.split('>').next().unwrap_or_default();
            let Some(classes) = attr(tag, "class") else {
                continue;
            };
            let class_list: Vec<&str> = classes.split_whitespace().collect();
            if !class_list.contains(&CONTROL_CLASS) {
                continue;
            }

            let raw_id = attr(tag, "data-course-id").map(unescape_html).unwrap_or_default();
            let course_id = match CourseId::new(raw_id) {
                Ok(course_id) => course_id,
                Err(err) => {
                    warn!("skipping control: {err}");
                    continue;
                }
            };
            let state = EnrollmentState::from_enrolled(class_list.contains(&ENROLLED_CLASS));
            controls.push(Control::new(course_id, state));
        }

        debug!(count = controls.len(), "bound controls");
        Self::from_controls(controls)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub async fn begin(&self, course_id: &CourseId) -> Begin {
        let mut controls = self.controls.lock().await;
        match controls.get_mut(course_id) {
            None => Begin::Unbound,
            Some(control) if control.pending => Begin::Busy,
            Some(control) => {
                control.pending = true;
                Begin::Started(plan(control.state))
            }
        }
    }

    /// Clears the in-flight flag; `next` is only given on success.
    pub async fn finish(&self, course_id: &CourseId, next: Option<EnrollmentState>) {
        let mut controls = self.controls.lock().await;
        if let Some(control) = controls.get_mut(course_id) {
            control.pending = false;
            if let Some(next) = next {
                control.state = next;
            }
        }
    }

    /// Ties the in-flight flag of a started activation to a guard, so an
    /// activation that is dropped midway still releases its control.
    pub fn in_flight(&self, course_id: &CourseId) -> InFlight {
        InFlight {
            page: self.clone(),
            course_id: course_id.clone(),
            done: false,
        }
    }

    pub async fn control(&self, course_id: &CourseId) -> Option<Control> {
        self.controls.lock().await.get(course_id).cloned()
    }

    /// Controls in page order.
    pub async fn snapshot(&self) -> Vec<Control> {
        let controls = self.controls.lock().await;
        self.order
            .iter()
            .filter_map(|course_id| controls.get(course_id).cloned())
            .collect()
    }

    pub async fn views(&self) -> Vec<ControlView> {
        self.snapshot().await.iter().map(Control::view).collect()
    }
}

/// Clears `pending` for one control when the activation ends, either through
/// [`InFlight::complete`] or by being dropped.
#[derive(Debug)]
pub struct InFlight {
    page: Page,
    course_id: CourseId,
    done: bool,
}

impl InFlight {
    pub async fn complete(mut self, next: Option<EnrollmentState>) {
        self.done = true;
        self.page.finish(&self.course_id, next).await;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        debug!(course_id = %self.course_id, "activation abandoned before completion");
        if let Ok(mut controls) = self.page.controls.try_lock() {
            if let Some(control) = controls.get_mut(&self.course_id) {
                control.pending = false;
            }
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let page = self.page.clone();
            let course_id = self.course_id.clone();
            handle.spawn(async move { page.finish(&course_id, None).await });
        }
    }
}

fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let mut search_from = 0;
    while let Some(found) = tag[search_from..].find(&needle) {
        let start = search_from + found;
        let boundary = tag[..start].chars().next_back().is_some_and(char::is_whitespace);
        let value_start = start + needle.len();
        if boundary {
            let len = tag[value_start..].find('"')?;
            return Some(&tag[value_start..value_start + len]);
        }
        search_from = value_start;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Action;

    fn course(id: &str) -> CourseId {
        CourseId::new(id).unwrap()
    }

    const RENDERED: &str = r#"
      <div class="course-card">
        <button class="unenroll-btn bg-green-600 hover:bg-green-700" data-course-id="CS101">
          <i class="fas fa-user-check mr-1"></i>Enrolled
        </button>
        <button
          data-course-id="MA201" class="unenroll-btn bg-gray-500 hover:bg-gray-600">Enroll</button>
        <button class="unenroll-btn bg-gray-500">No id</button>
        <button class="btn bg-green-600" data-course-id="OTHER">Not a control</button>
      </div>
    "#;

    #[tokio::test]
    async fn scan_seeds_state_from_markup() {
        let page = Page::scan(RENDERED);
        assert_eq!(page.len(), 2);

        let controls = page.snapshot().await;
        assert_eq!(controls[0].course_id, course("CS101"));
        assert_eq!(controls[0].state, EnrollmentState::Enrolled);
        assert_eq!(controls[1].course_id, course("MA201"));
        assert_eq!(controls[1].state, EnrollmentState::NotEnrolled);
        assert!(page.control(&course("OTHER")).await.is_none());
    }

    #[tokio::test]
    async fn begin_marks_pending_and_blocks_repeat() {
        let page = Page::from_controls([Control::new(course("CS101"), EnrollmentState::NotEnrolled)]);
        let id = course("CS101");

        let Begin::Started(transition) = page.begin(&id).await else {
            panic!("expected activation to start");
        };
        assert_eq!(transition.action, Action::Enroll);
        assert_eq!(page.begin(&id).await, Begin::Busy);

        page.finish(&id, None).await;
        let control = page.control(&id).await.unwrap();
        assert!(!control.pending);
        assert_eq!(control.state, EnrollmentState::NotEnrolled);

        assert!(matches!(page.begin(&id).await, Begin::Started(_)));
        page.finish(&id, Some(transition.next)).await;
        assert_eq!(page.control(&id).await.unwrap().state, EnrollmentState::Enrolled);
    }

    #[tokio::test]
    async fn dropped_in_flight_guard_releases_control() {
        let page = Page::from_controls([Control::new(course("CS101"), EnrollmentState::Enrolled)]);
        let id = course("CS101");

        assert!(matches!(page.begin(&id).await, Begin::Started(_)));
        drop(page.in_flight(&id));

        let control = page.control(&id).await.unwrap();
        assert!(!control.pending);
        assert_eq!(control.state, EnrollmentState::Enrolled);
        assert!(matches!(page.begin(&id).await, Begin::Started(_)));
    }

    #[tokio::test]
    async fn unknown_course_is_unbound() {
        let page = Page::default();
        assert!(page.is_empty());
        assert_eq!(page.begin(&course("CS101")).await, Begin::Unbound);
    }

    #[test]
    fn attr_requires_boundary() {
        let tag = r#"button data-class="x" class="unenroll-btn""#;
        assert_eq!(attr(tag, "class"), Some("unenroll-btn"));
        assert_eq!(attr(tag, "data-course-id"), None);
    }
}
