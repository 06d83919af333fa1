//! Email templates and client links.

use url::Url;

use super::OutgoingMail;
use crate::{NetlinkError, Result};

/// Builds links into the web client.
#[derive(Debug, Clone)]
pub struct ClientLinks {
    base: Url,
}

impl ClientLinks {
    /// Create from the client base URL, e.g. `http://localhost:5173`.
    pub fn new(client_url: &str) -> Result<Self> {
        let mut base = Url::parse(client_url)
            .map_err(|e| NetlinkError::Config(format!("invalid client_url: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(NetlinkError::Config(format!(
                "client_url cannot be a base URL: {client_url}"
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    fn join(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    /// `{client_url}/profile/{username}`
    pub fn profile(&self, username: &str) -> String {
        self.join(&["profile", username])
    }

    /// `{client_url}/post/{post_id}`
    pub fn post(&self, post_id: i64) -> String {
        self.join(&["post", &post_id.to_string()])
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Welcome email sent after signup.
pub fn welcome(to_email: &str, name: &str, profile_url: &str) -> OutgoingMail {
    let safe_name = escape_html(name);
    let html_body = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; padding: 20px; color: #333;">
    <h2>Welcome to NetLink, {safe_name}!</h2>
    <p>We're excited to have you join our professional community.</p>
    <p>Start by completing your profile and connecting with colleagues.</p>
    <p style="margin: 30px 0;">
        <a href="{profile_url}" style="background-color: #0077B5; color: #fff; padding: 14px 28px; text-decoration: none; border-radius: 25px; display: inline-block;">Complete Your Profile</a>
    </p>
    <p style="color: #999; font-size: 12px;">The NetLink Team</p>
</body>
</html>"#
    );

    let text_body = format!(
        "Welcome to NetLink, {name}!\n\n\
        We're excited to have you join our professional community.\n\
        Complete your profile: {profile_url}\n\n\
        The NetLink Team"
    );

    OutgoingMail {
        to_email: to_email.to_string(),
        to_name: name.to_string(),
        subject: "Welcome to NetLink".to_string(),
        html_body,
        text_body,
    }
}

/// Notification that someone commented on the recipient's post.
pub fn comment_notification(
    to_email: &str,
    recipient_name: &str,
    commenter_name: &str,
    post_url: &str,
    comment: &str,
) -> OutgoingMail {
    let safe_recipient = escape_html(recipient_name);
    let safe_commenter = escape_html(commenter_name);
    let safe_comment = escape_html(comment);
    let html_body = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; padding: 20px; color: #333;">
    <h2>New Comment on Your Post</h2>
    <p>Hello {safe_recipient},</p>
    <p>{safe_commenter} commented on your post:</p>
    <blockquote style="border-left: 4px solid #0077B5; margin: 20px 0; padding-left: 12px; color: #555;">{safe_comment}</blockquote>
    <p style="margin: 30px 0;">
        <a href="{post_url}" style="background-color: #0077B5; color: #fff; padding: 14px 28px; text-decoration: none; border-radius: 25px; display: inline-block;">View Comment</a>
    </p>
    <p style="color: #999; font-size: 12px;">The NetLink Team</p>
</body>
</html>"#
    );

    let text_body = format!(
        "Hello {recipient_name},\n\n\
        {commenter_name} commented on your post:\n\n\
        \"{comment}\"\n\n\
        View it here: {post_url}"
    );

    OutgoingMail {
        to_email: to_email.to_string(),
        to_name: recipient_name.to_string(),
        subject: "New Comment on Your Post".to_string(),
        html_body,
        text_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_links() {
        let links = ClientLinks::new("http://localhost:5173").unwrap();
        assert_eq!(links.profile("alice"), "http://localhost:5173/profile/alice");
        assert_eq!(links.post(42), "http://localhost:5173/post/42");
    }

    #[test]
    fn test_client_links_with_path_prefix() {
        let links = ClientLinks::new("https://example.com/app/").unwrap();
        assert_eq!(links.post(7), "https://example.com/app/post/7");
    }

    #[test]
    fn test_client_links_escapes_segments() {
        let links = ClientLinks::new("http://localhost:5173").unwrap();
        assert_eq!(
            links.profile("a b/c"),
            "http://localhost:5173/profile/a%20b%2Fc"
        );
    }

    #[test]
    fn test_client_links_invalid() {
        assert!(ClientLinks::new("not a url").is_err());
    }

    #[test]
    fn test_welcome_email() {
        let mail = welcome("a@example.com", "Alice", "http://x/profile/alice");
        assert_eq!(mail.subject, "Welcome to NetLink");
        assert_eq!(mail.to_name, "Alice");
        assert!(mail.html_body.contains("http://x/profile/alice"));
        assert!(mail.text_body.contains("Welcome to NetLink, Alice!"));
    }

    #[test]
    fn test_comment_email_escapes_html() {
        let mail = comment_notification(
            "a@example.com",
            "Alice",
            "Bob",
            "http://x/post/1",
            "<script>alert(1)</script>",
        );
        assert!(mail.html_body.contains("&lt;script&gt;"));
        assert!(!mail.html_body.contains("<script>"));
        assert!(mail.text_body.contains("Bob commented on your post"));
    }
}
