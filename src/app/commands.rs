use std::str::FromStr;

use crate::{
    app::{render, session::Session},
    error::{AppError, AppResult},
    models::{GenreFilter, ImdbId, SortKey, ViewMode},
    services::pipeline::{PipelineStatus, ScrollMetrics},
};

pub const HELP: &str = "\
commands:
  search <text>         run a full search
  type <text>           update the query box and show suggestions
  pick <n>              search for suggestion n
  recent [n]            list recent searches, or re-run search n
  more                  load the next page
  scroll <view> <offset> <content>
                        report scroll position (auto-loads near the bottom)
  clear                 clear query, results and suggestions
  genre <name|All>      filter by genre
  genres                list genres present in the results
  years <from> <to>     filter by release year (inclusive)
  rating <min>          filter by minimum rating (0-10)
  sort <relevance|year|rating>
  list                  show the current results
  show <imdb id>        show one record in full
  watch <imdb id>       toggle watchlist membership
  fav <imdb id>         toggle favorite
  theme                 toggle dark/light theme
  view [grid|list]      set or toggle the view mode
  help                  show this text
  quit                  exit";

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Type(String),
    Pick(usize),
    Recent(Option<usize>),
    More,
    Scroll(ScrollMetrics),
    Clear,
    Genre(GenreFilter),
    Genres,
    Years(i32, i32),
    Rating(f64),
    Sort(SortKey),
    List,
    Show(ImdbId),
    Watch(ImdbId),
    Fav(ImdbId),
    Theme,
    View(Option<ViewMode>),
    Help,
    Quit,
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::InvalidInput(message.into())
}

fn number<T: FromStr>(value: Option<&str>, what: &str) -> AppResult<T> {
    value
        .ok_or_else(|| invalid(format!("missing {}", what)))?
        .parse()
        .map_err(|_| invalid(format!("invalid {}", what)))
}

/// 1-based position typed by the user, converted to an index
fn position(value: Option<&str>) -> AppResult<usize> {
    match number::<usize>(value, "position")? {
        0 => Err(invalid("positions start at 1")),
        n => Ok(n - 1),
    }
}

fn imdb_id(rest: &str) -> AppResult<ImdbId> {
    if rest.is_empty() {
        return Err(invalid("missing IMDb id"));
    }
    Ok(ImdbId::new(rest))
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        match verb.to_lowercase().as_str() {
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "type" | "t" => Ok(Command::Type(rest.to_string())),
            "pick" => Ok(Command::Pick(position(args.next())?)),
            "recent" => match args.next() {
                Some(n) => Ok(Command::Recent(Some(position(Some(n))?))),
                None => Ok(Command::Recent(None)),
            },
            "more" | "m" => Ok(Command::More),
            "scroll" => Ok(Command::Scroll(ScrollMetrics {
                viewport_height: number(args.next(), "viewport height")?,
                scroll_offset: number(args.next(), "scroll offset")?,
                content_height: number(args.next(), "content height")?,
            })),
            "clear" => Ok(Command::Clear),
            "genre" => Ok(Command::Genre(GenreFilter::parse(rest))),
            "genres" => Ok(Command::Genres),
            "years" => Ok(Command::Years(
                number(args.next(), "start year")?,
                number(args.next(), "end year")?,
            )),
            "rating" => Ok(Command::Rating(number(args.next(), "rating")?)),
            "sort" => Ok(Command::Sort(rest.parse()?)),
            "list" | "ls" => Ok(Command::List),
            "show" => Ok(Command::Show(imdb_id(rest)?)),
            "watch" => Ok(Command::Watch(imdb_id(rest)?)),
            "fav" => Ok(Command::Fav(imdb_id(rest)?)),
            "theme" => Ok(Command::Theme),
            "view" => match args.next() {
                Some(mode) => Ok(Command::View(Some(mode.parse()?))),
                None => Ok(Command::View(None)),
            },
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err(invalid("empty command")),
            other => Err(invalid(format!("unknown command: {}", other))),
        }
    }
}

fn status_line(session: &Session, status: PipelineStatus) -> String {
    match status {
        PipelineStatus::Loaded => render::render_results(session),
        PipelineStatus::Empty if session.query_text().trim().chars().count() < 2 => {
            "Type at least 2 characters to search.".to_string()
        }
        PipelineStatus::Empty | PipelineStatus::Error => "No movies found.".to_string(),
        PipelineStatus::Idle | PipelineStatus::Loading => String::new(),
    }
}

/// Applies `command` to the session and returns the text to display
pub async fn execute(session: &mut Session, command: Command) -> AppResult<String> {
    let output = match command {
        Command::Search(text) => {
            let status = session.search(&text).await?;
            status_line(session, status)
        }
        Command::Type(text) => {
            let suggestions = session.input_changed(&text).await;
            render::render_suggestions(suggestions)
        }
        Command::Pick(index) => {
            let status = session.select_suggestion(index).await?;
            status_line(session, status)
        }
        Command::Recent(None) => render::render_recent(session.recent_searches()),
        Command::Recent(Some(index)) => {
            let status = session.rerun_recent(index).await?;
            status_line(session, status)
        }
        Command::More => {
            if session.load_more().await {
                render::render_results(session)
            } else {
                "Nothing more to load.".to_string()
            }
        }
        Command::Scroll(metrics) => {
            if session.on_scroll(metrics).await {
                render::render_results(session)
            } else {
                String::new()
            }
        }
        Command::Clear => {
            session.clear();
            "Cleared.".to_string()
        }
        Command::Genre(genre) => {
            session.set_genre(genre);
            render::render_results(session)
        }
        Command::Genres => render::render_genres(&session.genre_options()),
        Command::Years(from, to) => {
            session.set_years(from, to)?;
            render::render_results(session)
        }
        Command::Rating(min) => {
            session.set_min_rating(min)?;
            render::render_results(session)
        }
        Command::Sort(key) => {
            session.set_sort(key);
            render::render_results(session)
        }
        Command::List => render::render_results(session),
        Command::Show(id) => match session.record(&id) {
            Some(record) => render::render_detail(record, session.preferences()),
            None => return Err(invalid(format!("{} is not in the current results", id))),
        },
        Command::Watch(id) => {
            if session.toggle_watchlist(&id).await? {
                format!("Added {} to watchlist.", id)
            } else {
                format!("Removed {} from watchlist.", id)
            }
        }
        Command::Fav(id) => {
            if session.toggle_favorite(&id).await? {
                format!("Added {} to favorites.", id)
            } else {
                format!("Removed {} from favorites.", id)
            }
        }
        Command::Theme => {
            let theme = session.toggle_theme().await?;
            format!("Theme: {}", theme)
        }
        Command::View(mode) => {
            let mode = mode.unwrap_or(match session.preferences().view_mode() {
                ViewMode::Grid => ViewMode::List,
                ViewMode::List => ViewMode::Grid,
            });
            session.set_view_mode(mode).await?;
            render::render_results(session)
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };

    Ok(output)
}
