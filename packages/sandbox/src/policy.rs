use livepad_synthesizer::RUNTIME_URLS;

/// Capabilities granted to a preview document.
///
/// Rendered as an iframe `sandbox` attribute for the playground page and as a
/// `Content-Security-Policy` for documents served on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    allow: Vec<&'static str>,
    script_origins: Vec<String>,
}

impl SandboxPolicy {
    /// Scripts only: no same-origin, no navigation, no popups, no forms
    pub fn scripts_only() -> Self {
        let mut script_origins: Vec<String> = Vec::new();
        for url in RUNTIME_URLS {
            let origin = origin_of(url);
            if !script_origins.iter().any(|o| o == origin) {
                script_origins.push(origin.to_string());
            }
        }

        Self {
            allow: vec!["allow-scripts"],
            script_origins,
        }
    }

    pub fn allows(&self, token: &str) -> bool {
        self.allow.iter().any(|t| *t == token)
    }

    pub fn script_origins(&self) -> &[String] {
        &self.script_origins
    }

    /// Value for `<iframe sandbox="...">`
    pub fn iframe_attribute(&self) -> String {
        self.allow.join(" ")
    }

    /// Value for the `Content-Security-Policy` response header
    pub fn content_security_policy(&self) -> String {
        let mut directives = vec![format!("sandbox {}", self.allow.join(" "))];
        directives.push("default-src 'none'".to_string());
        directives.push(format!(
            "script-src 'unsafe-inline' {}",
            self.script_origins.join(" ")
        ));
        directives.push("style-src 'unsafe-inline'".to_string());
        directives.push("img-src data:".to_string());
        directives.push("connect-src 'none'".to_string());
        directives.push("form-action 'none'".to_string());
        directives.push("base-uri 'none'".to_string());
        directives.join("; ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::scripts_only()
    }
}

fn origin_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find('/') {
        Some(end) => &url[..after_scheme + end],
        None => url,
    }
}
