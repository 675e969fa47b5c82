//! The fixed category and difficulty sets offered by the provider.

use std::fmt;

/// Trivia category with its provider id (9..=32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    GeneralKnowledge,
    Books,
    Film,
    Music,
    MusicalsAndTheatres,
    Television,
    VideoGames,
    BoardGames,
    ScienceAndNature,
    Computers,
    Mathematics,
    Mythology,
    Sports,
    Geography,
    History,
    Politics,
    Art,
    Celebrities,
    Animals,
    Vehicles,
    Comics,
    Gadgets,
    AnimeAndManga,
    CartoonAndAnimations,
}

impl Category {
    pub const ALL: [Category; 24] = [
        Category::GeneralKnowledge,
        Category::Books,
        Category::Film,
        Category::Music,
        Category::MusicalsAndTheatres,
        Category::Television,
        Category::VideoGames,
        Category::BoardGames,
        Category::ScienceAndNature,
        Category::Computers,
        Category::Mathematics,
        Category::Mythology,
        Category::Sports,
        Category::Geography,
        Category::History,
        Category::Politics,
        Category::Art,
        Category::Celebrities,
        Category::Animals,
        Category::Vehicles,
        Category::Comics,
        Category::Gadgets,
        Category::AnimeAndManga,
        Category::CartoonAndAnimations,
    ];

    /// Numeric id used in the `category` query parameter.
    pub fn id(self) -> u8 {
        match self {
            Category::GeneralKnowledge => 9,
            Category::Books => 10,
            Category::Film => 11,
            Category::Music => 12,
            Category::MusicalsAndTheatres => 13,
            Category::Television => 14,
            Category::VideoGames => 15,
            Category::BoardGames => 16,
            Category::ScienceAndNature => 17,
            Category::Computers => 18,
            Category::Mathematics => 19,
            Category::Mythology => 20,
            Category::Sports => 21,
            Category::Geography => 22,
            Category::History => 23,
            Category::Politics => 24,
            Category::Art => 25,
            Category::Celebrities => 26,
            Category::Animals => 27,
            Category::Vehicles => 28,
            Category::Comics => 29,
            Category::Gadgets => 30,
            Category::AnimeAndManga => 31,
            Category::CartoonAndAnimations => 32,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::GeneralKnowledge => "General Knowledge",
            Category::Books => "Entertainment: Books",
            Category::Film => "Entertainment: Film",
            Category::Music => "Entertainment: Music",
            Category::MusicalsAndTheatres => "Entertainment: Musicals & Theatres",
            Category::Television => "Entertainment: Television",
            Category::VideoGames => "Entertainment: Video Games",
            Category::BoardGames => "Entertainment: Board Games",
            Category::ScienceAndNature => "Science & Nature",
            Category::Computers => "Science: Computers",
            Category::Mathematics => "Science: Mathematics",
            Category::Mythology => "Mythology",
            Category::Sports => "Sports",
            Category::Geography => "Geography",
            Category::History => "History",
            Category::Politics => "Politics",
            Category::Art => "Art",
            Category::Celebrities => "Celebrities",
            Category::Animals => "Animals",
            Category::Vehicles => "Vehicles",
            Category::Comics => "Entertainment: Comics",
            Category::Gadgets => "Science: Gadgets",
            Category::AnimeAndManga => "Entertainment: Japanese Anime & Manga",
            Category::CartoonAndAnimations => "Entertainment: Cartoon & Animations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Value used in the `difficulty` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ids_are_contiguous() {
        let ids: Vec<u8> = Category::ALL.iter().map(|c| c.id()).collect();
        assert_eq!(ids, (9..=32).collect::<Vec<u8>>());
    }

    #[test]
    fn test_category_from_id() {
        assert_eq!(Category::from_id(9), Some(Category::GeneralKnowledge));
        assert_eq!(Category::from_id(32), Some(Category::CartoonAndAnimations));
        assert_eq!(Category::from_id(8), None);
        assert_eq!(Category::from_id(33), None);
    }

    #[test]
    fn test_difficulty_query_values() {
        let values: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(values, ["easy", "medium", "hard"]);
    }
}
