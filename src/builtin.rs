use crate::command::{Context, ExitCode, Flow, ShellCommand};
use crate::error::{CommandError, IoContext, RegistryError};
use crate::registry::CommandRegistry;
use crate::tokenizer;
use argh::{EarlyExit, FromArgs};
use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) from the tokens of
/// their parameter text and executed in-process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "mkdir" or "cd".
    fn name() -> &'static str;

    /// One line for the `help` listing.
    fn summary() -> &'static str;

    /// Executes the parsed command.
    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError>;
}

/// Adapter exposing a [`BuiltinCommand`] through the raw-parameter [`ShellCommand`] contract.
pub(crate) struct Builtin<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Builtin<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand> ShellCommand for Builtin<T> {
    fn name(&self) -> &str {
        T::name()
    }

    fn summary(&self) -> &str {
        T::summary()
    }

    fn usage(&self) -> String {
        match T::from_args(&[T::name()], &["--help"]) {
            Err(EarlyExit { output, .. }) => output,
            Ok(_) => format!("{}: {}\n", T::name(), T::summary()),
        }
    }

    fn execute(&self, params: &str, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        let tokens = tokenizer::tokenize_parameters(params);
        log::trace!("{} tokens: {tokens:?}", T::name());
        // builtins take no flags: everything but a lone `--help` is positional
        let args: Vec<&str> = match tokens.as_slice() {
            [only] if only == "--help" => vec!["--help"],
            [] => Vec::new(),
            _ => std::iter::once("--")
                .chain(tokens.iter().map(String::as_str))
                .collect(),
        };

        match T::from_args(&[T::name()], &args) {
            Ok(cmd) => T::execute(cmd, ctx),
            // --help
            Err(EarlyExit {
                output,
                status: Ok(()),
            }) => {
                write!(ctx.stdout, "{output}").io_context(|| "cannot write output")?;
                Ok(Flow::Continue)
            }
            Err(EarlyExit {
                output,
                status: Err(()),
            }) => Err(CommandError::invalid(
                output.split_whitespace().collect::<Vec<_>>().join(" "),
            )),
        }
    }
}

/// Registry holding every built-in command, in the order `help` lists them.
pub fn default_registry() -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();
    registry.register(Box::new(Builtin::<Mkdir>::default()))?;
    registry.register(Box::new(Builtin::<Dir>::default()))?;
    registry.register(Box::new(Builtin::<Cd>::default()))?;
    registry.register(Box::new(Builtin::<Pwd>::default()))?;
    registry.register(Box::new(Builtin::<Rm>::default()))?;
    registry.register(Box::new(Builtin::<Mv>::default()))?;
    registry.register(Box::new(Builtin::<Exit>::default()))?;
    registry.register(Box::new(Builtin::<Cp>::default()))?;
    registry.register(Box::new(Builtin::<Help>::default()))?;
    Ok(registry)
}

fn emit(out: &mut dyn Write, line: impl Display) -> Result<(), CommandError> {
    writeln!(out, "{line}").io_context(|| "cannot write output")
}

fn require(value: &str, what: &str) -> Result<(), CommandError> {
    if value.is_empty() {
        Err(CommandError::invalid(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

#[derive(FromArgs)]
/// create a directory.
pub struct Mkdir {
    #[argh(positional)]
    /// directory to create; its parent must already exist.
    pub dir: String,
}

impl BuiltinCommand for Mkdir {
    fn name() -> &'static str {
        "mkdir"
    }

    fn summary() -> &'static str {
        "create a directory"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        require(&self.dir, "directory name")?;
        let path = ctx.env.resolve(&self.dir);
        fs::create_dir(&path)
            .io_context(|| format!("cannot create directory '{}'", self.dir))?;
        log::debug!("created {}", path.display());
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// list the entries of a directory, one name per line.
pub struct Dir {
    #[argh(positional)]
    /// directory to list; defaults to the current directory.
    pub dir: Option<String>,
}

impl BuiltinCommand for Dir {
    fn name() -> &'static str {
        "dir"
    }

    fn summary() -> &'static str {
        "list directory contents"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        let shown = self.dir.as_deref().unwrap_or(".");
        let path = ctx.env.resolve(shown);

        let mut names = fs::read_dir(&path)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
                    .collect::<io::Result<Vec<String>>>()
            })
            .io_context(|| format!("cannot list '{shown}'"))?;
        names.sort();

        for name in names {
            emit(ctx.stdout, name)?;
        }
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// change the current working directory.
/// if no target is provided, changes to the home directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory; the home directory when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn summary() -> &'static str {
        "change the current directory"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        let target = match self.target.as_deref() {
            Some(t) if !t.is_empty() => ctx.env.resolve(t),
            _ => ctx
                .env
                .home
                .clone()
                .ok_or_else(|| CommandError::invalid("no target and HOME not set"))?,
        };
        let shown = match &self.target {
            Some(t) if !t.is_empty() => t.clone(),
            _ => target.display().to_string(),
        };

        let canonical = fs::canonicalize(&target)
            .io_context(|| format!("cannot change directory to '{shown}'"))?;
        if !canonical.is_dir() {
            return Err(CommandError::invalid(format!("'{shown}' is not a directory")));
        }

        log::debug!("cd {}", canonical.display());
        ctx.env.current_dir = canonical;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn summary() -> &'static str {
        "print the current directory"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        emit(ctx.stdout, ctx.env.current_dir.display())?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// remove a file, or a directory together with everything inside it.
pub struct Rm {
    #[argh(positional)]
    /// file or directory to remove.
    pub path: String,
}

impl BuiltinCommand for Rm {
    fn name() -> &'static str {
        "rm"
    }

    fn summary() -> &'static str {
        "remove a file or directory tree"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        require(&self.path, "path")?;
        let path = ctx.env.resolve(&self.path);
        let context = || format!("cannot remove '{}'", self.path);

        let meta = fs::symlink_metadata(&path).io_context(context)?;
        let target = canonical_target(&path).io_context(context)?;
        let cwd = fs::canonicalize(&ctx.env.current_dir)
            .unwrap_or_else(|_| ctx.env.current_dir.clone());
        if cwd.starts_with(&target) {
            return Err(CommandError::invalid(format!(
                "cannot remove '{}': it contains the current directory",
                self.path
            )));
        }

        let removed = if meta.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.io_context(context)?;
        log::debug!("removed {}", path.display());
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// move or rename a file or directory.
/// when the destination is an existing directory, the source is moved inside it.
pub struct Mv {
    #[argh(positional)]
    /// file or directory to move.
    pub source: String,

    #[argh(positional)]
    /// new name, or directory to move into.
    pub dest: String,
}

impl BuiltinCommand for Mv {
    fn name() -> &'static str {
        "mv"
    }

    fn summary() -> &'static str {
        "move or rename a file or directory"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        require(&self.source, "source")?;
        require(&self.dest, "destination")?;
        let source = ctx.env.resolve(&self.source);
        fs::symlink_metadata(&source).io_context(|| format!("cannot stat '{}'", self.source))?;
        let target = destination(&source, ctx.env.resolve(&self.dest));
        check_transfer(&source, &target, "move", &self.source, &self.dest)?;

        let context = || format!("cannot move '{}' to '{}'", self.source, self.dest);
        match fs::rename(&source, &target) {
            Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
                move_across_devices(&source, &target).io_context(context)?
            }
            res => res.io_context(context)?,
        }
        log::debug!("moved {} to {}", source.display(), target.display());
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// leave the shell.
pub struct Exit {
    #[argh(positional)]
    /// exit status between 0 and 255; defaults to 0.
    pub code: Option<u8>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn summary() -> &'static str {
        "leave the shell"
    }

    fn execute(self, _ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Exit(self.code.map_or(0, ExitCode::from)))
    }
}

#[derive(FromArgs)]
/// copy a file or a whole directory tree.
/// when the destination is an existing directory, the copy is placed inside it.
pub struct Cp {
    #[argh(positional)]
    /// file or directory to copy.
    pub source: String,

    #[argh(positional)]
    /// name of the copy, or directory to copy into.
    pub dest: String,
}

impl BuiltinCommand for Cp {
    fn name() -> &'static str {
        "cp"
    }

    fn summary() -> &'static str {
        "copy a file or directory tree"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        require(&self.source, "source")?;
        require(&self.dest, "destination")?;
        let source = ctx.env.resolve(&self.source);
        let meta =
            fs::metadata(&source).io_context(|| format!("cannot stat '{}'", self.source))?;
        let target = destination(&source, ctx.env.resolve(&self.dest));
        check_transfer(&source, &target, "copy", &self.source, &self.dest)?;

        let copied = if meta.is_dir() {
            copy_tree(&source, &target)
        } else {
            fs::copy(&source, &target).map(drop)
        };
        copied.io_context(|| format!("cannot copy '{}' to '{}'", self.source, self.dest))?;
        log::debug!("copied {} to {}", source.display(), target.display());
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// list the available commands, or show how to use one of them.
pub struct Help {
    #[argh(positional)]
    /// command to describe.
    pub command: Option<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn summary() -> &'static str {
        "show this list, or usage of one command"
    }

    fn execute(self, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        if let Some(name) = self.command {
            let command = ctx
                .registry
                .lookup(&name)
                .ok_or_else(|| CommandError::invalid(format!("{name}: no such command")))?;
            write!(ctx.stdout, "{}", command.usage()).io_context(|| "cannot write output")?;
            return Ok(Flow::Continue);
        }

        emit(ctx.stdout, "Available commands:")?;
        for command in ctx.registry.iter() {
            emit(
                ctx.stdout,
                format_args!("  {:<8}{}", command.name(), command.summary()),
            )?;
        }
        emit(ctx.stdout, "Run '<command> --help' for details.")?;
        Ok(Flow::Continue)
    }
}

/// Canonical form of `path` without following a final symlink.
fn canonical_target(path: &Path) -> io::Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => Ok(fs::canonicalize(parent)?.join(name)),
        _ => fs::canonicalize(path),
    }
}

/// Where `source` lands for `mv`/`cp`: inside `dest` if that is a directory.
fn destination(source: &Path, dest: PathBuf) -> PathBuf {
    match source.file_name() {
        Some(name) if dest.is_dir() => dest.join(name),
        _ => dest,
    }
}

/// Refuse moving or copying something onto itself or into its own subtree.
fn check_transfer(
    source: &Path,
    target: &Path,
    verb: &str,
    from: &str,
    to: &str,
) -> Result<(), CommandError> {
    let source = fs::canonicalize(source).io_context(|| format!("cannot stat '{from}'"))?;
    // a missing parent is reported by the transfer itself
    let Ok(target) = canonical_target(target) else {
        return Ok(());
    };

    if target == source {
        return Err(CommandError::invalid(format!(
            "'{from}' and '{to}' are the same file"
        )));
    }
    if source.is_dir() && target.starts_with(&source) {
        return Err(CommandError::invalid(format!(
            "cannot {verb} '{from}' into itself"
        )));
    }
    Ok(())
}

fn copy_tree(source: &Path, target: &Path) -> io::Result<()> {
    fs::create_dir_all(target)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = target.join(entry.file_name());
        let kind = entry.file_type()?;
        if kind.is_symlink() {
            copy_link(&from, &to)?;
        } else if kind.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

/// Links inside a copied tree are recreated, not followed.
#[cfg(unix)]
fn copy_link(from: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(from)?, to)
}

#[cfg(not(unix))]
fn copy_link(from: &Path, to: &Path) -> io::Result<()> {
    if fs::metadata(from)?.is_file() {
        fs::copy(from, to)?;
    }
    Ok(())
}

fn move_across_devices(source: &Path, target: &Path) -> io::Result<()> {
    if fs::symlink_metadata(source)?.is_dir() {
        copy_tree(source, target)?;
        fs::remove_dir_all(source)
    } else {
        fs::copy(source, target)?;
        fs::remove_file(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use std::fs;
    use tempfile::TempDir;

    /// Run one command string through the default registry.
    fn run(env: &mut Environment, line: &str) -> (Result<Flow, CommandError>, String) {
        let registry = default_registry().unwrap();
        let name = tokenizer::extract_command_name(line);
        let params = tokenizer::extract_parameters(line);
        let command = registry.lookup(name).unwrap();

        let mut out = Vec::new();
        let res = command.execute(
            params,
            &mut Context {
                env: &mut *env,
                registry: &registry,
                stdout: &mut out,
            },
        );
        (res, String::from_utf8(out).unwrap())
    }

    fn setup() -> (TempDir, Environment) {
        let tmp = TempDir::new().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        (tmp, Environment::at(root))
    }

    fn is_invalid(res: &Result<Flow, CommandError>) -> bool {
        matches!(res, Err(CommandError::InvalidArguments(_)))
    }

    fn is_io(res: &Result<Flow, CommandError>) -> bool {
        matches!(res, Err(CommandError::Io { .. }))
    }

    #[test]
    fn test_default_registry_order() {
        let registry = default_registry().unwrap();
        let names: Vec<&str> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            ["mkdir", "dir", "cd", "pwd", "rm", "mv", "exit", "cp", "help"]
        );
    }

    #[test]
    fn test_mkdir_creates_relative_to_current_dir() {
        let (_tmp, mut env) = setup();

        let (res, _) = run(&mut env, "mkdir \"new dir\"");

        assert_eq!(res.unwrap(), Flow::Continue);
        assert!(env.current_dir.join("new dir").is_dir());
    }

    #[test]
    fn test_mkdir_existing_is_io_failure() {
        let (_tmp, mut env) = setup();
        fs::create_dir(env.current_dir.join("a")).unwrap();

        let (res, _) = run(&mut env, "mkdir a");

        assert!(is_io(&res));
        assert!(res.unwrap_err().to_string().starts_with("cannot create directory 'a'"));
    }

    #[test]
    fn test_mkdir_argument_count_is_validated() {
        let (_tmp, mut env) = setup();

        assert!(is_invalid(&run(&mut env, "mkdir").0));
        assert!(is_invalid(&run(&mut env, "mkdir a b").0));
        assert!(is_invalid(&run(&mut env, "mkdir ''").0));
        assert!(!env.current_dir.join("a").exists());
    }

    #[test]
    fn test_dir_lists_sorted_names() {
        let (_tmp, mut env) = setup();
        fs::create_dir(env.current_dir.join("beta")).unwrap();
        fs::write(env.current_dir.join("alpha.txt"), "x").unwrap();
        fs::write(env.current_dir.join("gamma"), "y").unwrap();

        let (res, out) = run(&mut env, "dir");

        assert!(res.is_ok());
        assert_eq!(out, "alpha.txt\nbeta\ngamma\n");
    }

    #[test]
    fn test_dir_of_missing_directory_fails() {
        let (_tmp, mut env) = setup();
        assert!(is_io(&run(&mut env, "dir nowhere").0));
    }

    #[test]
    fn test_cd_relative_and_back() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::create_dir_all(root.join("a").join("b")).unwrap();

        assert!(run(&mut env, "cd a/b").0.is_ok());
        assert_eq!(env.current_dir, root.join("a").join("b"));

        assert!(run(&mut env, "cd ../..").0.is_ok());
        assert_eq!(env.current_dir, root);
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let (_tmp, mut env) = setup();
        let other = TempDir::new().unwrap();
        let canonical_other = fs::canonicalize(other.path()).unwrap();

        let line = format!("cd '{}'", canonical_other.display());
        assert!(run(&mut env, &line).0.is_ok());

        assert_eq!(env.current_dir, canonical_other);
    }

    #[test]
    fn test_cd_to_home_when_none() {
        let (tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::create_dir(root.join("sub")).unwrap();
        env.current_dir = root.join("sub");

        env.home = None;
        assert!(is_invalid(&run(&mut env, "cd").0));

        env.home = Some(tmp.path().to_path_buf());
        assert!(run(&mut env, "cd").0.is_ok());
        assert_eq!(env.current_dir, root);
    }

    #[test]
    fn test_cd_failures_leave_directory_unchanged() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::write(root.join("file"), "").unwrap();

        assert!(is_io(&run(&mut env, "cd missing").0));
        assert!(is_invalid(&run(&mut env, "cd file").0));
        assert_eq!(env.current_dir, root);
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let (_tmp, mut env) = setup();

        let (res, out) = run(&mut env, "pwd");

        assert!(res.is_ok());
        assert_eq!(out, format!("{}\n", env.current_dir.display()));
        assert!(is_invalid(&run(&mut env, "pwd extra").0));
    }

    #[test]
    fn test_rm_file_and_tree() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::write(root.join("f"), "data").unwrap();
        fs::create_dir_all(root.join("d").join("nested")).unwrap();
        fs::write(root.join("d").join("nested").join("g"), "data").unwrap();

        assert!(run(&mut env, "rm f").0.is_ok());
        assert!(run(&mut env, "rm d").0.is_ok());

        assert!(!root.join("f").exists());
        assert!(!root.join("d").exists());
    }

    #[test]
    fn test_rm_missing_is_io_failure() {
        let (_tmp, mut env) = setup();

        let (res, _) = run(&mut env, "rm ghost");

        assert!(is_io(&res));
        assert!(res.unwrap_err().to_string().starts_with("cannot remove 'ghost'"));
    }

    #[test]
    fn test_rm_refuses_current_directory_and_ancestors() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::create_dir(root.join("inner")).unwrap();
        env.current_dir = root.join("inner");

        assert!(is_invalid(&run(&mut env, "rm .").0));
        assert!(is_invalid(&run(&mut env, "rm ..").0));
        assert!(root.join("inner").is_dir());
    }

    #[test]
    fn test_cp_file_to_new_name_and_into_directory() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::write(root.join("a.txt"), "hello").unwrap();
        fs::create_dir(root.join("box")).unwrap();

        assert!(run(&mut env, "cp a.txt b.txt").0.is_ok());
        assert!(run(&mut env, "cp a.txt box").0.is_ok());

        assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "hello");
        assert_eq!(fs::read_to_string(root.join("box").join("a.txt")).unwrap(), "hello");
        assert!(root.join("a.txt").exists());
    }

    #[test]
    fn test_cp_directory_tree() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::create_dir_all(root.join("src").join("deep")).unwrap();
        fs::write(root.join("src").join("deep").join("f"), "1").unwrap();

        assert!(run(&mut env, "cp src copy").0.is_ok());

        assert_eq!(
            fs::read_to_string(root.join("copy").join("deep").join("f")).unwrap(),
            "1"
        );
    }

    #[test]
    fn test_cp_refuses_self_and_own_subtree() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::write(root.join("f"), "").unwrap();
        fs::create_dir(root.join("d")).unwrap();

        assert!(is_invalid(&run(&mut env, "cp f f").0));
        assert!(is_invalid(&run(&mut env, "cp d d/inside").0));
        assert!(is_io(&run(&mut env, "cp nothing x").0));
        assert!(!root.join("d").join("inside").exists());
    }

    #[test]
    fn test_mv_rename_and_into_directory() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::write(root.join("a"), "payload").unwrap();
        fs::create_dir(root.join("target")).unwrap();

        assert!(run(&mut env, "mv a b").0.is_ok());
        assert!(!root.join("a").exists());
        assert_eq!(fs::read_to_string(root.join("b")).unwrap(), "payload");

        assert!(run(&mut env, "mv b target").0.is_ok());
        assert_eq!(
            fs::read_to_string(root.join("target").join("b")).unwrap(),
            "payload"
        );
    }

    #[test]
    fn test_mv_failures() {
        let (_tmp, mut env) = setup();
        fs::create_dir(env.current_dir.join("d")).unwrap();

        assert!(is_io(&run(&mut env, "mv ghost x").0));
        assert!(is_invalid(&run(&mut env, "mv d d").0));
        assert!(is_invalid(&run(&mut env, "mv d").0));
        assert!(env.current_dir.join("d").is_dir());
    }

    #[test]
    fn test_exit_codes() {
        let (_tmp, mut env) = setup();

        assert_eq!(run(&mut env, "exit").0.unwrap(), Flow::Exit(0));
        assert_eq!(run(&mut env, "exit 7").0.unwrap(), Flow::Exit(7));
        assert!(is_invalid(&run(&mut env, "exit 300").0));
        assert!(is_invalid(&run(&mut env, "exit soon").0));
    }

    #[test]
    fn test_help_lists_every_command_in_order() {
        let (_tmp, mut env) = setup();

        let (res, out) = run(&mut env, "help");

        assert!(res.is_ok());
        let listed: Vec<&str> = out
            .lines()
            .filter_map(|line| line.strip_prefix("  "))
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(
            listed,
            ["mkdir", "dir", "cd", "pwd", "rm", "mv", "exit", "cp", "help"]
        );
    }

    #[test]
    fn test_help_for_one_command() {
        let (_tmp, mut env) = setup();

        let (res, out) = run(&mut env, "help cp");
        assert!(res.is_ok());
        assert!(out.contains("cp"));
        assert!(out.contains("copy a file or a whole directory tree"));

        let (res, _) = run(&mut env, "help nosuch");
        assert_eq!(res.unwrap_err().to_string(), "nosuch: no such command");
    }

    #[test]
    fn test_help_flag_prints_usage_and_succeeds() {
        let (_tmp, mut env) = setup();

        let (res, out) = run(&mut env, "mkdir --help");

        assert_eq!(res.unwrap(), Flow::Continue);
        assert!(out.contains("mkdir"));
        assert!(!env.current_dir.join("--help").exists());
    }

    #[test]
    fn test_help_word_is_an_ordinary_argument() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::write(root.join("help"), "x").unwrap();

        let (res, out) = run(&mut env, "rm help");
        assert_eq!(res.unwrap(), Flow::Continue);
        assert!(out.is_empty());
        assert!(!root.join("help").exists());

        assert!(run(&mut env, "mkdir help").0.is_ok());
        assert!(root.join("help").is_dir());
        assert!(run(&mut env, "cd help").0.is_ok());
        assert_eq!(env.current_dir, root.join("help"));
    }

    #[test]
    fn test_dashed_names_are_not_flags() {
        let (_tmp, mut env) = setup();

        assert!(run(&mut env, "mkdir -x").0.is_ok());
        assert!(env.current_dir.join("-x").is_dir());
        assert!(is_invalid(&run(&mut env, "mkdir --help extra").0));
    }

    #[test]
    fn test_argument_errors_are_one_line() {
        let (_tmp, mut env) = setup();

        for line in ["mkdir", "mv a", "cp", "pwd extra", "exit soon"] {
            let err = run(&mut env, line).0.unwrap_err().to_string();
            assert!(!err.is_empty(), "{line}");
            assert!(!err.contains('\n'), "{line}: {err:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_cp_keeps_links_inside_tree() {
        let (_tmp, mut env) = setup();
        let root = env.current_dir.clone();
        fs::create_dir(root.join("d")).unwrap();
        fs::write(root.join("d").join("f"), "1").unwrap();
        std::os::unix::fs::symlink(".", root.join("d").join("loop")).unwrap();

        assert!(run(&mut env, "cp d copy").0.is_ok());

        let link = root.join("copy").join("loop");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), Path::new("."));
        assert_eq!(fs::read_to_string(root.join("copy").join("f")).unwrap(), "1");
    }
}
