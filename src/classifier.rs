//! Keyword classification of commands into a closed set of categories.
//!
//! Each command gets exactly one category: the rules below are tried in
//! order and the first one with a keyword contained in the lowercased
//! command wins. Keywords are plain substrings, so short ones also match
//! inside longer words (`ls` inside `false`); a trailing space narrows most
//! of them to whole command names.

use std::fmt;

use lazy_static::lazy_static;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Python,
    Java,
    Rust,
    CCpp,
    CSharp,
    JavaScript,
    Go,
    Ruby,
    Php,
    Shell,
    Assembly,
    R,
    Perl,
    Haskell,
    Lua,
    Dart,
    Scala,
    Kotlin,
    Swift,
}

impl Language {
    /// Every language, in the order it is checked.
    pub const ALL: [Language; 19] = [
        Language::Python,
        Language::Java,
        Language::Rust,
        Language::CCpp,
        Language::CSharp,
        Language::JavaScript,
        Language::Go,
        Language::Ruby,
        Language::Php,
        Language::Shell,
        Language::Assembly,
        Language::R,
        Language::Perl,
        Language::Haskell,
        Language::Lua,
        Language::Dart,
        Language::Scala,
        Language::Kotlin,
        Language::Swift,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Rust => "Rust",
            Language::CCpp => "C/C++",
            Language::CSharp => "C#",
            Language::JavaScript => "JavaScript",
            Language::Go => "Go",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::Shell => "Shell",
            Language::Assembly => "Assembly",
            Language::R => "R",
            Language::Perl => "Perl",
            Language::Haskell => "Haskell",
            Language::Lua => "Lua",
            Language::Dart => "Dart",
            Language::Scala => "Scala",
            Language::Kotlin => "Kotlin",
            Language::Swift => "Swift",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["python", "pip", "py ", "python3", "python2", "pylint", "pyflakes", "mypy", "black"],
            Language::Java => &["java ", "javac", "mvn ", "gradle", "ant ", "jbang", "groovy"],
            Language::Rust => &["rustc", "cargo", "rustup", "rustfmt", "clippy"],
            Language::CCpp => &["gcc", "g++", "clang", "make ", "cmake", "ninja", "gdb", "lldb", "valgrind", "cpp"],
            Language::CSharp => &["dotnet", "mono", "msbuild", "csc"],
            Language::JavaScript => &["node ", "npm ", "yarn", "deno", "tsc", "bun"],
            Language::Go => &["go ", "gofmt", "golangci-lint"],
            Language::Ruby => &["ruby ", "gem ", "rake", "bundle"],
            Language::Php => &["php ", "composer", "phpunit"],
            Language::Shell => &["bash ", "sh ", "zsh ", "fish ", "dash", "ksh"],
            Language::Assembly => &["as ", "nasm", "yasm", "objdump", "gdb"],
            Language::R => &["r ", "rscript", "radian"],
            Language::Perl => &["perl ", "cpan"],
            Language::Haskell => &["ghc", "ghci", "stack", "cabal"],
            Language::Lua => &["lua ", "luac"],
            Language::Dart => &["dart ", "flutter"],
            Language::Scala => &["scala ", "scalac"],
            Language::Kotlin => &["kotlin", "kotlinc"],
            Language::Swift => &["swift ", "swiftc"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Navigation,
    FileOperations,
    Editors,
    VersionControl,
    PackageManagement,
    SystemMonitoring,
    Network,
    Language(Language),
    Databases,
    Containers,
    ShellBuiltins,
    Other,
}

impl Category {
    /// Compact label for fixed-width boxes and chart axes.
    pub fn short_label(&self) -> String {
        match self {
            Category::Navigation => "Navigation".to_string(),
            Category::FileOperations => "File Ops".to_string(),
            Category::Editors => "Editors".to_string(),
            Category::VersionControl => "Version Ctrl".to_string(),
            Category::PackageManagement => "Pkg Mgmt".to_string(),
            Category::SystemMonitoring => "Sys Monitor".to_string(),
            Category::Network => "Network".to_string(),
            Category::Language(lang) => format!("Lang: {}", lang.name()),
            Category::Databases => "Databases".to_string(),
            Category::Containers => "Containers".to_string(),
            Category::ShellBuiltins => "Shell Builtins".to_string(),
            Category::Other => "Other".to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Navigation => f.write_str("Navigation"),
            Category::FileOperations => f.write_str("File Operations"),
            Category::Editors => f.write_str("Editors"),
            Category::VersionControl => f.write_str("Version Control"),
            Category::PackageManagement => f.write_str("Package Management"),
            Category::SystemMonitoring => f.write_str("System Monitoring"),
            Category::Network => f.write_str("Network"),
            Category::Language(lang) => write!(f, "Language:{}", lang.name()),
            Category::Databases => f.write_str("Databases"),
            Category::Containers => f.write_str("Containers/Virtualization"),
            Category::ShellBuiltins => f.write_str("Shell Builtins"),
            Category::Other => f.write_str("Other"),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One classification rule: the category wins if any keyword is a
/// substring of the lowercased command.
#[derive(Debug)]
pub struct Rule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl Rule {
    fn matches(&self, cmd_lower: &str) -> bool {
        self.keywords.iter().any(|&k| cmd_lower.contains(k))
    }
}

const NAV_COMMANDS: &[&str] = &["cd ", "ls", "pwd", "dir", "pushd", "popd", "ll", "tree", "exa", "fd", "ranger", "nnn", "lf"];
const FILE_OPS: &[&str] = &["cp ", "mv ", "rm ", "mkdir", "touch", "chmod", "chown", "ln ", "rsync", "tar ",
                            "gzip", "gunzip", "zip", "unzip", "7z", "rename", "trash", "shred"];
const EDITORS: &[&str] = &["vim ", "nano ", "emacs", "code ", "subl ", "gedit", "pico", "vi", "micro", "kate",
                           "atom", "neovim", "nano", "ed", "sed ", "awk "];
const VCS: &[&str] = &["git ", "hg ", "svn ", "fossil", "bzr", "cvs", "darcs", "git-lfs", "git-flow"];
const PACKAGE_MANAGERS: &[&str] = &["apt", "yum", "dnf", "pacman", "brew", "pip ", "npm ", "snap", "flatpak",
                                    "zypper", "port", "apk", "dpkg", "rpm", "gem", "cargo", "go ", "dotnet"];
const SYSTEM_MONITORS: &[&str] = &["top", "htop", "ps ", "kill", "df ", "du ", "free", "btop", "glances", "nmon",
                                   "iotop", "iftop", "nethogs", "vmstat", "iostat", "dstat", "sar", "mpstat", "pidstat"];
const NETWORK_COMMANDS: &[&str] = &["ssh ", "scp ", "ping", "curl", "wget", "ifconfig", "ip ", "sftp", "ftp", "telnet",
                                    "netstat", "ss", "traceroute", "tracepath", "mtr", "dig", "nslookup", "nmcli", "iwconfig"];
const DATABASES: &[&str] = &["mysql", "psql", "sqlite3", "mongo", "redis-cli", "sqlcmd", "clickhouse-client",
                             "influx", "cqlsh", "neo4j", "arangosh", "cockroach sql"];
const CONTAINERS: &[&str] = &["docker ", "podman", "kubectl", "oc ", "ctr", "nerdctl", "lxc", "lxd", "vagrant",
                              "virsh", "qemu", "lima", "colima"];
const SHELL_BUILTINS: &[&str] = &["export", "source", "alias", "echo", "printf", "read", "set", "unset", "type",
                                  "hash", "history", "fc", "jobs", "bg", "fg", "wait", "times", "trap"];

lazy_static! {
    /// Classification order. Languages sit between Network and Databases.
    pub static ref RULES: Vec<Rule> = {
        let mut rules = vec![
            Rule { category: Category::Navigation, keywords: NAV_COMMANDS },
            Rule { category: Category::FileOperations, keywords: FILE_OPS },
            Rule { category: Category::Editors, keywords: EDITORS },
            Rule { category: Category::VersionControl, keywords: VCS },
            Rule { category: Category::PackageManagement, keywords: PACKAGE_MANAGERS },
            Rule { category: Category::SystemMonitoring, keywords: SYSTEM_MONITORS },
            Rule { category: Category::Network, keywords: NETWORK_COMMANDS },
        ];
        rules.extend(Language::ALL.iter().map(|&lang| Rule {
            category: Category::Language(lang),
            keywords: lang.keywords(),
        }));
        rules.extend([
            Rule { category: Category::Databases, keywords: DATABASES },
            Rule { category: Category::Containers, keywords: CONTAINERS },
            Rule { category: Category::ShellBuiltins, keywords: SHELL_BUILTINS },
        ]);
        rules
    };
}

pub fn categorize_command(cmd: &str) -> Category {
    let cmd_lower = cmd.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&cmd_lower))
        .map_or(Category::Other, |rule| rule.category)
}
