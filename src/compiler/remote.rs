//! Remote backend: the Closure Compiler web service.
//!
//! Sources and options are sent as an `application/x-www-form-urlencoded`
//! POST; the JSON response maps directly onto [`CompileResult`].

use super::{CompileError, CompileRequest, CompileResult, Compiler};
use reqwest::blocking::Client;

/// Default compiler service endpoint.
pub const DEFAULT_URL: &str = "https://closure-compiler.appspot.com/compile";

/// Options the service rejects.
const FILTERED_KEYS: &[&str] = &["language_in", "language_out", "rewrite_polyfills", "define"];

/// Response sections requested from the service.
const OUTPUT_INFO: &[&str] = &["compiled_code", "warnings", "errors", "statistics"];

/// Compiler backed by the web service.
#[derive(Debug, Clone)]
pub struct RemoteCompiler {
    client: Client,
    url: String,
}

impl RemoteCompiler {
    /// Create a client. Requests have no timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, CompileError> {
        let client = Client::builder()
            .timeout(None)
            .user_agent(format!("blockbuild/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the form body.
    ///
    /// Library sources are skipped (the service links its own copy of the
    /// Closure library), so `Input_N` counts only submitted sources.
    fn form(request: &CompileRequest) -> Vec<(&'static str, String)> {
        let mut form = Vec::new();
        for (key, value) in request.options.params() {
            if FILTERED_KEYS.contains(&key) {
                continue;
            }
            if key == "compilation_level" {
                form.push((key, request.options.compilation_level.remote_name().to_string()));
            } else {
                form.push((key, value));
            }
        }
        for source in Self::submitted(request) {
            form.push(("js_code", source.content.clone()));
        }
        form.push(("output_format", "json".to_string()));
        for info in OUTPUT_INFO {
            form.push(("output_info", (*info).to_string()));
        }
        form
    }

    fn submitted(request: &CompileRequest) -> impl Iterator<Item = &super::SourceFile> {
        request.sources.iter().filter(|s| !s.library)
    }
}

impl Compiler for RemoteCompiler {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError> {
        let response = self.client.post(&self.url).form(&Self::form(request)).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompileError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let mut result: CompileResult = serde_json::from_str(&body)?;
        result.inputs = Self::submitted(request).map(|s| s.name.clone()).collect();
        Ok(result)
    }
}
