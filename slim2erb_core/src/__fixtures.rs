//! Shared fixtures for the core test suite.

use crate::GeneratorOptions;
use crate::convert_source;

/// Convert with default options, discarding diagnostics.
pub fn convert(source: &str) -> String {
	let (output, _) = convert_source(source, &GeneratorOptions::default());
	output
}

pub const FORM_PAGE: &str = r#"form action="/submit" method="post"
  .form-group
    label for="email" Email
    input#email type="email" name="email"
  .form-group
    label for="password" Password
    input#password type="password" name="password"
  button.btn.btn-primary type="submit" Submit"#;

pub const FORM_PAGE_ERB: &str = r#"<form action="/submit" method="post">
  <div class="form-group">
    <label for="email">Email</label>
    <input id="email" type="email" name="email">
  </div>
  <div class="form-group">
    <label for="password">Password</label>
    <input id="password" type="password" name="password">
  </div>
  <button class="btn btn-primary" type="submit">Submit</button>
</form>"#;

pub const MIXED_PAGE: &str = r#".wrapper
  header
    nav
      - if @user
        span= @user.name
        a href="/logout" Logout
      - else
        a href="/login" Login
  main
    - @posts.each do |post|
      article.post
        h2= post.title
        p= post.summary"#;

pub const MIXED_PAGE_ERB: &str = r#"<div class="wrapper">
  <header>
    <nav>
      <% if @user %>
        <span><%= @user.name %></span>
        <a href="/logout">Logout</a>
      <% else %>
        <a href="/login">Login</a>
      <% end %>
    </nav>
  </header>
  <main>
    <% @posts.each do |post| %>
      <article class="post">
        <h2><%= post.title %></h2>
        <p><%= post.summary %></p>
      </article>
    <% end %>
  </main>
</div>"#;
