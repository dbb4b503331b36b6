use crate::control::{Action, CourseId};
use crate::errors::ToggleError;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use std::future::Future;

/// The remote side of an activation: one attempt, success or a typed failure.
pub trait EnrollmentApi: Send + Sync {
    fn send(
        &self,
        action: Action,
        course_id: &CourseId,
    ) -> impl Future<Output = Result<(), ToggleError>> + Send;
}

/// Talks to the course backend over HTTP. Redirects are followed and the final
/// status decides success.
#[derive(Debug, Clone)]
pub struct HttpEnrollmentApi {
    client: Client,
    base_url: Url,
}

impl HttpEnrollmentApi {
    pub fn new(base_url: Url) -> Result<Self, ToggleError> {
        let client = Client::builder()
            .build()
            .map_err(|err| ToggleError::Config(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// `{base}/course/{course_id}/{action}` with the id escaped as one segment.
    pub fn action_url(&self, action: Action, course_id: &CourseId) -> Result<Url, ToggleError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ToggleError::Config(format!("{} cannot be a base url", self.base_url)))?;
            segments
                .pop_if_empty()
                .extend(["course", course_id.as_str(), action.as_str()]);
        }
        Ok(url)
    }
}

impl EnrollmentApi for HttpEnrollmentApi {
    async fn send(&self, action: Action, course_id: &CourseId) -> Result<(), ToggleError> {
        let url = self.action_url(action, course_id)?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|err| ToggleError::transport(action, err))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ToggleError::RemoteRejected {
                action,
                status: status.as_u16(),
            })
        }
    }
}
