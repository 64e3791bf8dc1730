use crate::core::types::Token;
use tokio::sync::RwLock;

/// Last fetched launchpad tokens, shared between the watcher and readers.
#[derive(Default)]
pub struct TokenStore {
    tokens: RwLock<Vec<Token>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_tokens(&self, tokens: Vec<Token>) {
        *self.tokens.write().await = tokens;
    }

    /// Adds a freshly created token in front, replacing a stale copy of it.
    pub async fn add_token(&self, token: Token) {
        let mut tokens = self.tokens.write().await;
        tokens.retain(|t| t.token != token.token);
        tokens.insert(0, token);
    }

    pub async fn tokens(&self) -> Vec<Token> {
        self.tokens.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};

    fn token(b: u8, name: &str) -> Token {
        Token {
            token: Address::with_last_byte(b),
            name: name.to_string(),
            ticker: name.to_uppercase(),
            creator: Address::ZERO,
            sold: U256::ZERO,
            raised: U256::ZERO,
            is_open: true,
            image: String::new(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_set_then_add() {
        let store = TokenStore::new();
        store.set_tokens(vec![token(1, "a"), token(2, "b")]).await;
        store.add_token(token(3, "c")).await;
        store.add_token(token(1, "a2")).await;

        let names: Vec<_> = store.tokens().await.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a2", "c", "b"]);
    }

    #[tokio::test]
    async fn test_set_replaces() {
        let store = TokenStore::new();
        store.add_token(token(1, "a")).await;
        store.set_tokens(Vec::new()).await;
        assert!(store.tokens().await.is_empty());
    }
}
