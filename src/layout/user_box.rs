//! User menu of the mobile navbar: avatar button opening a drawer with
//! account links.

use crate::{config::FrontendUrls, session::CurrentUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuIcon {
    User,
    Setting,
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub icon: MenuIcon,
    pub target: String,
}

/// Full-page navigation to another frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMenu {
    display_name: String,
    avatar: Option<String>,
    open: bool,
    entries: Vec<MenuEntry>,
}

impl UserMenu {
    /// `None` when nobody is signed in; the navbar then renders nothing.
    pub fn for_user(user: Option<&CurrentUser>, urls: &FrontendUrls) -> Option<Self> {
        let user = user?;
        let logout = format!("{}/logout", urls.auth.trim_end_matches('/'));
        Some(Self {
            display_name: display_name(&user.fullname),
            avatar: user.avatar.clone(),
            open: false,
            entries: vec![
                MenuEntry {
                    label: "Minha conta",
                    icon: MenuIcon::User,
                    target: urls.account.clone(),
                },
                MenuEntry {
                    label: "Configurações",
                    icon: MenuIcon::Setting,
                    target: urls.account.clone(),
                },
                MenuEntry {
                    label: "Sair",
                    icon: MenuIcon::Logout,
                    target: logout,
                },
            ],
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Follow the entry at `index`, closing the drawer.
    pub fn activate(&mut self, index: usize) -> Option<Redirect> {
        let entry = self.entries.get(index)?;
        let redirect = Redirect {
            url: entry.target.clone(),
        };
        self.open = false;
        Some(redirect)
    }
}

/// First and last word of a full name ("Maria da Silva" → "Maria Silva").
pub fn display_name(fullname: &str) -> String {
    let mut words = fullname.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    match words.last() {
        Some(last) => format!("{first} {last}"),
        None => first.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_keeps_first_and_last() {
        assert_eq!(display_name("Maria da Silva Souza"), "Maria Souza");
        assert_eq!(display_name("  Ana  "), "Ana");
        assert_eq!(display_name(""), "");
    }
}
