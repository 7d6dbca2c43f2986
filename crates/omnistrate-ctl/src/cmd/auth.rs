use super::Context;
use anyhow::Context as _;
use colored::Colorize;
use omnistrate_core::auth;
use std::io::{BufRead, IsTerminal};

pub fn login(
    mut ctx: Context,
    email: &str,
    password: Option<String>,
    password_stdin: bool,
) -> anyhow::Result<()> {
    let tty = std::io::stdin().is_terminal();
    let password = match password_source(password, password_stdin, tty) {
        PasswordSource::Flag(p) => p,
        PasswordSource::Stdin => read_password(std::io::stdin().lock())?,
        PasswordSource::Prompt => inquire::Password::new("Password:")
            .without_confirmation()
            .prompt()
            .context("failed to read password")?,
    };

    let api = ctx.platform()?;
    auth::login(&api, &ctx.config_dir, &mut ctx.config, email, &password)
        .context("login failed")?;
    println!("✅ {}", format!("Logged in as {}", email.trim()).green());
    Ok(())
}

pub fn logout(mut ctx: Context) -> anyhow::Result<()> {
    match auth::logout(&ctx.config_dir, &mut ctx.config)? {
        Some(email) => println!("Logged out {email}."),
        None => println!("Not logged in."),
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum PasswordSource {
    Flag(String),
    Stdin,
    Prompt,
}

/// `--password` wins, then `--password-stdin`. Without either, a terminal gets a
/// masked prompt and anything else is read as piped input.
fn password_source(password: Option<String>, password_stdin: bool, tty: bool) -> PasswordSource {
    match password {
        Some(p) => PasswordSource::Flag(p),
        None if password_stdin || !tty => PasswordSource::Stdin,
        None => PasswordSource::Prompt,
    }
}

/// First line of `input` without the line terminator.
fn read_password(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_source_precedence() {
        assert_eq!(
            password_source(Some("pw".into()), false, true),
            PasswordSource::Flag("pw".into())
        );
        assert_eq!(password_source(None, true, true), PasswordSource::Stdin);
        assert_eq!(password_source(None, false, false), PasswordSource::Stdin);
        assert_eq!(password_source(None, false, true), PasswordSource::Prompt);
    }

    #[test]
    fn password_keeps_inner_whitespace() {
        assert_eq!(read_password("s3cret pass\n".as_bytes()).unwrap(), "s3cret pass");
        assert_eq!(read_password("abc\r\n".as_bytes()).unwrap(), "abc");
        assert_eq!(read_password("".as_bytes()).unwrap(), "");
    }
}
