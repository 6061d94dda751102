//! Path-style routes between the home screen and a game screen

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    /// `/game/:id`
    Game(String),
}

impl Route {
    /// Parse a path; anything unrecognized routes home.
    ///
    /// Unknown game ids are kept so the game screen can report them.
    pub fn parse(path: &str) -> Self {
        let path = path.trim().trim_start_matches('#');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["game", id] => Route::Game((*id).to_string()),
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        self.to_string()
    }

    /// Whether the route names a game the arcade can load
    pub fn is_playable(&self) -> bool {
        match self {
            Route::Home => true,
            Route::Game(id) => arcade::find(id).is_some(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Game(id) => write!(f, "/game/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/game/tetris"), Route::Game("tetris".into()));
        assert_eq!(Route::parse("#/game/tetris/"), Route::Game("tetris".into()));
        assert_eq!(Route::parse("/game"), Route::Home);
        assert_eq!(Route::parse("/scores/tetris"), Route::Home);
        assert_eq!(Route::parse("/game/tetris/extra"), Route::Home);
    }

    #[test]
    fn test_path_round_trips() {
        for route in [Route::Home, Route::Game("tetris".into())] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_unknown_game_is_not_playable() {
        assert!(Route::Game("tetris".into()).is_playable());
        assert!(!Route::Game("snake".into()).is_playable());
    }
}
