//! User-facing console output.
//! Prefix-style status lines, colored only when attached to a TTY, so piped
//! output stays clean for scripting.

use owo_colors::OwoColorize;

enum Level {
    Info,
    Warn,
    Error,
    Success,
}

fn emit(level: Level, msg: &str) {
    let tty = atty::is(atty::Stream::Stdout);
    match level {
        Level::Info => {
            if tty {
                println!("{} {}", "info:".cyan().bold(), msg);
            } else {
                println!("info: {}", msg);
            }
        }
        Level::Success => {
            if tty {
                println!("{} {}", "ok:".green().bold(), msg);
            } else {
                println!("ok: {}", msg);
            }
        }
        Level::Warn => {
            if tty {
                eprintln!("{} {}", "warn:".yellow().bold(), msg);
            } else {
                eprintln!("warn: {}", msg);
            }
        }
        Level::Error => {
            if tty {
                eprintln!("{} {}", "error:".red().bold(), msg);
            } else {
                eprintln!("error: {}", msg);
            }
        }
    }
}

pub fn print_info(msg: &str) {
    emit(Level::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Level::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Level::Error, msg);
}

pub fn print_success(msg: &str) {
    emit(Level::Success, msg);
}

/// Plain user-facing line (no prefix) for primary outputs such as the journal
/// listing, which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}
