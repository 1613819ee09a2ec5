//! Server-rendered HTML for the gate, landing and session pages.

use crate::config::PageConfig;
use crate::player::embed_url;
use crate::session::{SessionIdentity, EMPTY_TRANSCRIPT, LOAD_FAILED};

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape(title),
    )
}

fn error_line(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error" role="alert">{}</p>"#, html_escape(e)))
        .unwrap_or_default()
}

/// The gate page, with an optional inline error.
pub fn access_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<main class="gate">
<h1>Enter access code</h1>
<form method="post" action="/access">
<input type="password" name="access_code" placeholder="Access code" autofocus required>
<button type="submit">Continue</button>
</form>
{error}
</main>"#,
        error = error_line(error),
    );
    layout("Access", &body)
}

/// The landing form.  `link` and `name` refill the fields after an error.
pub fn landing_page(error: Option<&str>, link: &str, name: &str) -> String {
    let body = format!(
        r#"<main class="landing">
<h1>Learn from any video</h1>
<form method="post" action="/">
<input type="text" name="link" value="{link}" placeholder="Paste a YouTube link" required>
<input type="text" name="name" value="{name}" placeholder="Your name">
<button type="submit">Start learning</button>
</form>
{error}
</main>"#,
        link = html_escape(link),
        name = html_escape(name),
        error = error_line(error),
    );
    layout("Video Tutor", &body)
}

/// Transcript panel behaviour: fetch on first expand, cache a successful
/// answer (even an empty one), retry after a failure.
const PANEL_SCRIPT: &str = r#"(function () {
  var panel = document.getElementById("transcript");
  var status = panel.querySelector(".panel-status");
  var list = panel.querySelector(".segments");
  var cached = null;
  var loading = false;
  function show(text) {
    status.textContent = text;
    status.hidden = text === "";
  }
  panel.addEventListener("toggle", function () {
    if (!panel.open || cached !== null || loading) return;
    loading = true;
    show(panel.dataset.loading);
    fetch(panel.dataset.source)
      .then(function (res) {
        if (!res.ok) throw new Error("status " + res.status);
        return res.json();
      })
      .then(function (items) {
        cached = items;
        list.replaceChildren();
        items.forEach(function (item) {
          var li = document.createElement("li");
          li.textContent = item.text;
          list.appendChild(li);
        });
        show(items.length === 0 ? panel.dataset.empty : "");
      })
      .catch(function () {
        show(panel.dataset.failed);
      })
      .finally(function () {
        loading = false;
      });
  });
})();"#;

/// URL the transcript panel fetches from.
pub fn transcript_source(video_id: &str) -> String {
    format!("/api/transcript?videoId={}", urlencoding::encode(video_id))
}

/// The session page: loading transition, player and the transcript panel.
///
/// The voice conversation runs in [`SessionPage`]; this page is the served
/// shell around the player.
///
/// [`SessionPage`]: crate::session::SessionPage
pub fn session_page(identity: &SessionIdentity, page: &PageConfig) -> String {
    let body = format!(
        r#"<div id="loading" class="loading">Preparing your session…</div>
<main id="session" class="session" hidden data-video-id="{video_attr}" data-student-name="{name}">
<section class="player">
<iframe id="player" src="{embed}" title="YouTube video player" allow="autoplay; encrypted-media" allowfullscreen></iframe>
</section>
<p class="greeting">Hi {name}! Here is the transcript if you need it.</p>
<details id="transcript" class="transcript" data-source="{source}" data-loading="Loading transcript…" data-empty="{empty}" data-failed="{failed}">
<summary>Transcript</summary>
<p class="panel-status" hidden></p>
<ol class="segments"></ol>
</details>
</main>
<script>
setTimeout(function () {{
  document.getElementById("loading").hidden = true;
  document.getElementById("session").hidden = false;
}}, {delay});
{panel_script}
</script>"#,
        video_attr = html_escape(&identity.video_id),
        name = html_escape(&identity.display_name),
        embed = html_escape(&embed_url(&identity.video_id)),
        source = html_escape(&transcript_source(&identity.video_id)),
        empty = html_escape(EMPTY_TRANSCRIPT),
        failed = html_escape(LOAD_FAILED),
        delay = page.loading_delay_ms,
        panel_script = PANEL_SCRIPT,
    );
    layout("Video Tutor", &body)
}

/// Value of the `data-source` attribute in a rendered session page.
#[cfg(test)]
pub(crate) fn panel_source_in(html: &str) -> Option<&str> {
    let start = html.find("data-source=\"")? + "data-source=\"".len();
    let len = html[start..].find('"')?;
    Some(&html[start..start + len])
}
