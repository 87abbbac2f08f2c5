//! Keyword handlers
// (c) 2024 Ross Younger

use std::str::FromStr as _;

use anyhow::{Context as _, Result};
use strum::{EnumString, IntoStaticStr};
use tracing::debug;

use super::{
    files::{Execution, FileReader},
    includes::resolve_include_path,
    model::fill_text,
    Block, CommonConfig, ConfigError, HostConfig, HostPattern, IdentityAgent, Match, MatchConfig,
    MatchKind, Origin,
};

/// The keywords we act on. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, strum::Display)]
#[strum(ascii_case_insensitive)]
pub(super) enum Keyword {
    Host,
    Match,
    Hostname,
    IdentityAgent,
    IdentityFile,
    Include,
    Port,
    User,
}

impl Keyword {
    /// Checks for exactly one argument, and returns it
    fn single_arg(self, args: Vec<String>) -> Result<String, ConfigError> {
        let [arg]: [String; 1] = args.try_into().map_err(|_| ConfigError::Arity {
            keyword: self.into(),
            expected: 1,
        })?;
        Ok(arg)
    }
}

/// Nested Include depth at which we give up
const INCLUDE_DEPTH_LIMIT: u8 = 16;

impl<R: FileReader> Execution<'_, R> {
    /// Applies a single directive to the execution context.
    pub(super) async fn dispatch(
        &mut self,
        keyword: Keyword,
        args: Vec<String>,
        line_number: usize,
    ) -> Result<()> {
        match keyword {
            Keyword::Host => self.host(&args, line_number),
            Keyword::Match => self.match_(args, line_number)?,
            Keyword::Hostname => self.hostname(keyword.single_arg(args)?)?,
            Keyword::IdentityAgent => self.identity_agent(keyword.single_arg(args)?)?,
            Keyword::IdentityFile => self.scope().identity_files.push(keyword.single_arg(args)?),
            Keyword::Include => self.include(args).await?,
            Keyword::Port => self.port(&keyword.single_arg(args)?)?,
            Keyword::User => {
                let user = keyword.single_arg(args)?;
                fill_text(&mut self.scope().user, Some(&user));
            }
        }
        Ok(())
    }

    fn origin(&self, line_number: usize) -> Origin {
        Origin {
            source: self.source.clone(),
            line_number,
        }
    }

    /// Adds a block to the global config and makes it current
    fn open_block(&mut self, block: Block) {
        self.global.configs.push(block);
        self.current = Some(self.global.configs.len() - 1);
    }

    /// The options of the current block, if one is open
    fn current_block(&mut self) -> Option<&mut CommonConfig> {
        let index = self.current?;
        self.global.configs.get_mut(index).map(Block::common_mut)
    }

    /// The options of the current block, or of global scope if no block is open
    fn scope(&mut self) -> &mut CommonConfig {
        let block = match self.current {
            Some(index) => self.global.configs.get_mut(index),
            None => None,
        };
        match block {
            Some(block) => block.common_mut(),
            None => &mut self.global.common,
        }
    }

    fn host(&mut self, args: &[String], line_number: usize) {
        let block = HostConfig {
            hosts: args.iter().map(|s| HostPattern::from(s.as_str())).collect(),
            origin: self.origin(line_number),
            ..Default::default()
        };
        self.open_block(Block::Host(block));
    }

    fn match_(&mut self, args: Vec<String>, line_number: usize) -> Result<(), ConfigError> {
        let mut matches = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let (negated, name) = match arg.strip_prefix('!') {
                Some(name) => (true, name),
                None => (false, arg.as_str()),
            };
            let kind = MatchKind::from_str(name).map_err(|_| {
                ConfigError::syntax(format!(
                    "Unknown keyword \"{}\" in Match statement",
                    name.to_lowercase()
                ))
            })?;
            let value = if kind.takes_value() {
                Some(args.next().ok_or_else(|| {
                    ConfigError::syntax(format!(
                        "Keyword \"{kind}\" in Match statement requires an argument"
                    ))
                })?)
            } else {
                None
            };
            matches.push(Match {
                kind,
                negated,
                value,
            });
        }
        let block = MatchConfig {
            matches,
            origin: self.origin(line_number),
            ..Default::default()
        };
        self.open_block(Block::Match(block));
        Ok(())
    }

    fn hostname(&mut self, value: String) -> Result<(), ConfigError> {
        let block = self.current_block().ok_or(ConfigError::Context {
            keyword: Keyword::Hostname.into(),
        })?;
        fill_text(&mut block.hostname, Some(&value));
        Ok(())
    }

    fn identity_agent(&mut self, value: String) -> Result<(), ConfigError> {
        let block = self.current_block().ok_or(ConfigError::Context {
            keyword: Keyword::IdentityAgent.into(),
        })?;
        if block.identity_agent.is_some() {
            return Ok(());
        }
        block.identity_agent = Some(if value.eq_ignore_ascii_case("none") {
            IdentityAgent::Disabled
        } else if value == "SSH_AUTH_SOCK" {
            IdentityAgent::Environment(value)
        } else {
            IdentityAgent::Socket(value)
        });
        Ok(())
    }

    fn port(&mut self, value: &str) -> Result<(), ConfigError> {
        let port = value
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ConfigError::Value {
                keyword: Keyword::Port.into(),
                expected: "a number",
            })?;
        let _ = self.scope().port.get_or_insert(port);
        Ok(())
    }

    async fn include(&mut self, args: Vec<String>) -> Result<()> {
        for arg in args {
            let path = resolve_include_path(&arg, &self.basepath)?;
            anyhow::ensure!(
                self.depth < INCLUDE_DEPTH_LIMIT,
                ConfigError::IncludeDepth(INCLUDE_DEPTH_LIMIT)
            );
            debug!("including {arg} from {} as {}", self.source, path.display());
            let content = self
                .reader
                .read(&path)
                .await
                .map_err(|e| ConfigError::Io {
                    what: "Include file",
                    path: arg.clone(),
                    resolved: Some(path.clone()),
                    kind: e.kind(),
                })?;
            let current = {
                let mut inner = self.nested(&path);
                Box::pin(inner.parse(&String::from_utf8_lossy(&content)))
                    .await
                    .with_context(|| format!("Error in {}", path.display()))?;
                inner.current
            };
            // A block opened by the included file stays open for us
            self.current = current;
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use std::path::Path;

    use anyhow::Result;
    use assertables::assert_contains;

    use crate::config::{
        files::{test_util::MemoryFiles, Execution},
        Block, ConfigError, GlobalConfig, IdentityAgent, MatchKind,
    };

    use super::Keyword;

    async fn run(text: &str) -> Result<GlobalConfig> {
        let mut global = GlobalConfig::default();
        let files = MemoryFiles::default();
        let mut exec = Execution::new(&mut global, Path::new("/base"), "<string>", &files);
        exec.parse(text).await?;
        Ok(global)
    }

    async fn run_err(text: &str) -> ConfigError {
        let err = run(text).await.unwrap_err();
        err.root_cause()
            .downcast_ref::<ConfigError>()
            .unwrap_or_else(|| panic!("unexpected error type: {err:#}"))
            .clone()
    }

    #[test]
    fn keyword_names() {
        assert_eq!("identityfile".parse::<Keyword>().unwrap(), Keyword::IdentityFile);
        assert_eq!("HostName".parse::<Keyword>().unwrap(), Keyword::Hostname);
        assert!("ProxyJump".parse::<Keyword>().is_err());
        assert_eq!(<&str>::from(Keyword::IdentityAgent), "IdentityAgent");
    }

    #[tokio::test]
    async fn host_blocks() -> Result<()> {
        let global = run("Host a !b *.c\nHost d").await?;
        assert_eq!(global.configs.len(), 2);
        let Block::Host(h) = &global.configs[0] else {
            panic!("expected a Host block");
        };
        let hosts: Vec<_> = h.hosts.iter().map(|p| (p.pattern.as_str(), p.negated)).collect();
        assert_eq!(hosts, vec![("a", false), ("b", true), ("*.c", false)]);
        assert_eq!(h.origin.line_number, 1);
        assert_eq!(global.configs[1].origin().line_number, 2);
        Ok(())
    }

    #[tokio::test]
    async fn match_blocks() -> Result<()> {
        let global = run("Match host github.com !User git all\nMatch canonical exec \"test -f x\"")
            .await?;
        let Block::Match(m) = &global.configs[0] else {
            panic!("expected a Match block");
        };
        assert_eq!(m.matches.len(), 3);
        assert_eq!(m.matches[0].kind, MatchKind::Host);
        assert_eq!(m.matches[0].value.as_deref(), Some("github.com"));
        assert!(!m.matches[0].negated);
        assert_eq!(m.matches[1].kind, MatchKind::User);
        assert!(m.matches[1].negated);
        assert_eq!(m.matches[1].value.as_deref(), Some("git"));
        assert_eq!(m.matches[2].kind, MatchKind::All);
        assert_eq!(m.matches[2].value, None);

        let Block::Match(m) = &global.configs[1] else {
            panic!("expected a Match block");
        };
        assert_eq!(m.matches[0].kind, MatchKind::Canonical);
        assert_eq!(m.matches[1].kind, MatchKind::Exec);
        assert_eq!(m.matches[1].value.as_deref(), Some("test -f x"));
        Ok(())
    }

    #[tokio::test]
    async fn match_errors() {
        let e = run_err("Match tagged foo").await;
        assert_contains!(e.to_string(), "Unknown keyword \"tagged\" in Match statement");
        let e = run_err("Match !Bogus").await;
        assert_contains!(e.to_string(), "\"bogus\"");
        let e = run_err("Match user").await;
        assert_contains!(e.to_string(), "requires an argument");
    }

    #[tokio::test]
    async fn hostname_first_wins() -> Result<()> {
        let global = run("Host a\nHostname one\nHostname two").await?;
        assert_eq!(global.configs[0].common().hostname.as_deref(), Some("one"));
        Ok(())
    }

    #[tokio::test]
    async fn block_only_keywords() {
        assert_eq!(
            run_err("Hostname x").await,
            ConfigError::Context {
                keyword: "Hostname"
            }
        );
        assert_eq!(
            run_err("IdentityAgent none").await,
            ConfigError::Context {
                keyword: "IdentityAgent"
            }
        );
    }

    #[tokio::test]
    async fn arity() {
        for text in [
            "Host x\nHostname",
            "Host x\nHostname a b",
            "IdentityFile",
            "IdentityFile a b",
            "Port",
            "User a b",
            "Host x\nIdentityAgent a b",
        ] {
            let e = run_err(text).await;
            assert!(
                matches!(e, ConfigError::Arity { expected: 1, .. }),
                "{text}: {e:?}"
            );
        }
        assert_contains!(
            run_err("Port 1 2").await.to_string(),
            "Keyword Port requires exactly 1 argument"
        );
    }

    #[tokio::test]
    async fn identity_agent_values() -> Result<()> {
        let global = run(
            "Host a\nIdentityAgent NONE\nIdentityAgent /x\nHost b\nIdentityAgent SSH_AUTH_SOCK\nHost c\nIdentityAgent ~/agent.sock",
        )
        .await?;
        let agents: Vec<_> = global
            .configs
            .iter()
            .map(|b| b.common().identity_agent.clone())
            .collect();
        assert_eq!(
            agents,
            vec![
                Some(IdentityAgent::Disabled),
                Some(IdentityAgent::Environment("SSH_AUTH_SOCK".into())),
                Some(IdentityAgent::Socket("~/agent.sock".into())),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn identity_files_append() -> Result<()> {
        let global = run(
            "IdentityFile g1\nIdentityFile g2\nHost a\nIdentityFile a1\nIdentityFile a1\nIdentityFile \"a 2\"",
        )
        .await?;
        assert_eq!(global.common.identity_files, vec!["g1", "g2"]);
        assert_eq!(
            global.configs[0].common().identity_files,
            vec!["a1", "a1", "a 2"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn port_values() -> Result<()> {
        let global = run("Port \"22\"\nPort 23\nHost a\nPort=2222").await?;
        assert_eq!(global.common.port, Some(22));
        assert_eq!(global.configs[0].common().port, Some(2222));
        for text in ["Port 0", "Port ssh", "Port -1", "Port 70000", "Port 2.5"] {
            assert_eq!(
                run_err(text).await,
                ConfigError::Value {
                    keyword: "Port",
                    expected: "a number"
                },
                "{text}"
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn empty_values_count_as_unset() -> Result<()> {
        let global = run("User \"\"\nUser root\nHost a\nHostname \"\"\nHostname real\nUser \"\"\nUser alice")
            .await?;
        assert_eq!(global.common.user.as_deref(), Some("root"));
        assert_eq!(global.configs[0].common().hostname.as_deref(), Some("real"));
        assert_eq!(global.configs[0].common().user.as_deref(), Some("alice"));
        Ok(())
    }

    #[tokio::test]
    async fn user_scoping() -> Result<()> {
        let global = run("User root\nUser admin\nHost a\nUser alice\nUser bob").await?;
        assert_eq!(global.common.user.as_deref(), Some("root"));
        assert_eq!(global.configs[0].common().user.as_deref(), Some("alice"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_keywords_ignored() -> Result<()> {
        let global = run("ForwardAgent yes\nHost a\nProxyJump \"unbalanced\nUser u").await?;
        assert_eq!(global.configs[0].common().user.as_deref(), Some("u"));
        Ok(())
    }
}
