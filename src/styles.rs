/// A design style offered in the gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub name: &'static str,
    pub description: &'static str,
    pub preview_url: &'static str,
}

pub const DESIGN_STYLES: &[Style] = &[
    Style {
        name: "Mid-Century Modern",
        description: "Organic forms, clean lines and a focus on function.",
        preview_url: "https://picsum.photos/seed/modern/200/150",
    },
    Style {
        name: "Scandinavian",
        description: "Bright and airy, mixing simplicity, minimalism and function.",
        preview_url: "https://picsum.photos/seed/scandinavian/200/150",
    },
    Style {
        name: "Bohemian",
        description: "Free-spirited and artistic, led by vivid colours and patterns.",
        preview_url: "https://picsum.photos/seed/bohemian/200/150",
    },
    Style {
        name: "Industrial",
        description: "Raw materials such as brick, metal and wood in wide open spaces.",
        preview_url: "https://picsum.photos/seed/industrial/200/150",
    },
    Style {
        name: "Minimalist",
        description: "Few pieces, a neutral palette and a less-is-more approach.",
        preview_url: "https://picsum.photos/seed/minimalist/200/150",
    },
    Style {
        name: "Coastal",
        description: "Sea-inspired light tones, natural materials and a relaxed feel.",
        preview_url: "https://picsum.photos/seed/coastal/200/150",
    },
    Style {
        name: "Japandi",
        description: "Japanese minimalism meets Scandinavian function.",
        preview_url: "https://picsum.photos/seed/japandi/200/150",
    },
];

pub fn find_style(name: &str) -> Option<&'static Style> {
    DESIGN_STYLES
        .iter()
        .find(|style| style.name.eq_ignore_ascii_case(name))
}
