use entity::prelude::Locale;

/// Interface strings of the HTML pages.
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub lang: &'static str,
    pub load_more: &'static str,
    pub exit_preview: &'static str,
    pub previous_post: &'static str,
    pub next_post: &'static str,
    pub not_found: &'static str,
    pub back_home: &'static str,
}

const PT_BR: Labels = Labels {
    lang: "pt-BR",
    load_more: "Carregar mais posts",
    exit_preview: "Sair do modo Preview",
    previous_post: "Post anterior",
    next_post: "Próximo post",
    not_found: "Página não encontrada",
    back_home: "Voltar para o início",
};

const EN_US: Labels = Labels {
    lang: "en-US",
    load_more: "Load more posts",
    exit_preview: "Exit preview mode",
    previous_post: "Previous post",
    next_post: "Next post",
    not_found: "Page not found",
    back_home: "Back to home",
};

impl Labels {
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::PtBr => &PT_BR,
            Locale::EnUs => &EN_US,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_labels_follow_locale() {
        assert_eq!(
            Labels::for_locale(Locale::PtBr).load_more,
            "Carregar mais posts"
        );
        assert_eq!(Labels::for_locale(Locale::EnUs).lang, "en-US");
    }
}
