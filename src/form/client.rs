//! HTTP client for the form endpoint.

use chrono::{DateTime, FixedOffset};
use reqwest::{StatusCode, redirect};
use tracing::{debug, warn};

use super::fields::build_form;
use crate::config::FormFieldIds;

/// One-shot form submission client.
///
/// Issues exactly one `application/x-www-form-urlencoded` POST per
/// submission and reports success as a boolean. No retries.
#[derive(Debug, Clone)]
pub struct FormClient {
    http: reqwest::Client,
    url: String,
    fields: FormFieldIds,
}

impl FormClient {
    /// Creates a client for the given endpoint.
    ///
    /// Redirects are not followed: only a direct 200 counts as success.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(url: String, fields: FormFieldIds) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { http, url, fields })
    }

    /// Submits one completed usage interval.
    ///
    /// Returns `true` iff the endpoint answered with status 200. Any other
    /// status or a transport failure is reported as `false`.
    pub async fn submit(
        &self,
        display_name: &str,
        start: &DateTime<FixedOffset>,
        end: &DateTime<FixedOffset>,
    ) -> bool {
        let body = build_form(&self.fields, display_name, start, end);

        match self.http.post(&self.url).form(&body).send().await {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK {
                    debug!("Form submitted for '{display_name}'");
                    true
                } else {
                    warn!("Form endpoint answered {status} for '{display_name}'");
                    false
                }
            }
            Err(e) => {
                warn!("Form submission failed for '{display_name}': {e}");
                false
            }
        }
    }
}
