//! Minimal server-rendered pages. All user text goes through [`escape`].

use std::fmt::Write;

use axum::response::Html;

use crate::{model::Note, response::Flash, session::SessionUser};

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, user: Option<&SessionUser>, flash: Option<&Flash>, body: &str) -> Html<String> {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{} - Notes</title></head>\n<body>\n<nav>",
        escape(title)
    );
    match user {
        Some(user) => {
            let _ = write!(
                page,
                "<span>Logged in as {}</span> <a href=\"/viewall\">My notes</a> <a href=\"/addnote\">Add note</a> <a href=\"/logout\">Log out</a>",
                escape(&user.username)
            );
        }
        None => page.push_str("<a href=\"/login\">Log in</a> <a href=\"/register\">Register</a>"),
    }
    page.push_str("</nav>\n");
    if let Some(flash) = flash {
        let _ = writeln!(
            page,
            "<div class=\"flash flash-{}\">{}</div>",
            flash.level.as_str(),
            escape(&flash.message)
        );
    }
    let _ = write!(page, "<main>\n<h1>{}</h1>\n{}</main>\n</body>\n</html>\n", escape(title), body);
    Html(page)
}

pub fn register_page(flash: Option<&Flash>) -> Html<String> {
    layout(
        "Register",
        None,
        flash,
        "<form method=\"post\" action=\"/register\">\n\
         <input name=\"username\" placeholder=\"Username\">\n\
         <input name=\"email\" type=\"email\" placeholder=\"Email\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\">Register</button>\n</form>\n",
    )
}

pub fn login_page(flash: Option<&Flash>) -> Html<String> {
    layout(
        "Log in",
        None,
        flash,
        "<form method=\"post\" action=\"/login\">\n\
         <input name=\"username\" placeholder=\"Username\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
         <button type=\"submit\">Log in</button>\n</form>\n",
    )
}

/// Used for both adding and editing; `note` pre-fills the fields.
pub fn note_form_page(
    user: &SessionUser,
    flash: Option<&Flash>,
    action: &str,
    note: Option<&Note>,
) -> Html<String> {
    let (heading, title, content) = match note {
        Some(note) => ("Edit note", escape(&note.title), escape(&note.content)),
        None => ("Add note", String::new(), String::new()),
    };
    let body = format!(
        "<form method=\"post\" action=\"{}\">\n\
         <input name=\"title\" placeholder=\"Title\" value=\"{}\">\n\
         <textarea name=\"content\" placeholder=\"Content\">{}</textarea>\n\
         <button type=\"submit\">Save</button>\n</form>\n",
        escape(action),
        title,
        content
    );
    layout(heading, Some(user), flash, &body)
}

pub fn note_list_page(user: &SessionUser, flash: Option<&Flash>, notes: &[Note]) -> Html<String> {
    let mut body = String::new();
    if notes.is_empty() {
        body.push_str("<p class=\"empty\">No notes yet.</p>\n");
    }
    for note in notes {
        let _ = write!(
            body,
            "<article class=\"note\">\n<h2><a href=\"/viewnotes/{id}\">{title}</a></h2>\n\
             <time>{created}</time>\n<p>{content}</p>\n\
             <a href=\"/updatenote/{id}\">Edit</a>\n\
             <form method=\"post\" action=\"/deletenote/{id}\"><button type=\"submit\">Delete</button></form>\n\
             </article>\n",
            id = note.id,
            title = escape(&note.title),
            created = note.created_at.format("%Y-%m-%d %H:%M"),
            content = escape(&note.content),
        );
    }
    layout("My notes", Some(user), flash, &body)
}

pub fn note_page(user: &SessionUser, flash: Option<&Flash>, note: &Note) -> Html<String> {
    let body = format!(
        "<article class=\"note\">\n<time>{}</time>\n<p>{}</p>\n</article>\n\
         <a href=\"/updatenote/{id}\">Edit</a>\n\
         <form method=\"post\" action=\"/deletenote/{id}\"><button type=\"submit\">Delete</button></form>\n",
        note.created_at.format("%Y-%m-%d %H:%M"),
        escape(&note.content),
        id = note.id,
    );
    layout(&note.title, Some(user), flash, &body)
}
