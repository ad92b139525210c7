use std::sync::Arc;

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::summarizer::Summarizer;

use super::Error;
use super::Form;
use super::Success;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryForm {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    summary: String,
}

pub async fn summarize(
    Extension(summarizer): Extension<Arc<dyn Summarizer>>,
    Form(form): Form<SummaryForm>,
) -> Result<Success<SummaryResponse>, Error> {
    if form.text.trim().is_empty() {
        return Err(Error::bad_request("Text can not be empty"));
    }

    let summary = summarizer.summarize(&form.text).await.map_err(|err| {
        tracing::error!("Could not summarize text: {err}");

        Error::bad_gateway("Could not summarize text").with_description(err)
    })?;

    Ok(Success::ok(SummaryResponse { summary }))
}
