#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Browse,
    More,
    Follow,
    Reload,
    Help,
    Quit,
}

pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.strip_prefix(':').unwrap_or(input).trim();

    if input.is_empty() {
        return None;
    }

    let (cmd, args) = match input.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (input, ""),
    };

    match cmd {
        "search" | "s" if !args.is_empty() => Some(Command::Search(args.to_owned())),
        "browse" | "all" => Some(Command::Browse),
        "more" | "m" => Some(Command::More),
        "follow" | "unfollow" | "f" => Some(Command::Follow),
        "reload" | "r" => Some(Command::Reload),
        "help" | "h" => Some(Command::Help),
        "quit" | "q" => Some(Command::Quit),
        _ => None,
    }
}
