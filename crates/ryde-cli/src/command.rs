use std::str::FromStr;

use anyhow::{bail, Context as _};
use ryde_shared::{
    req_args::{LoginReqArgs, RegisterReqArgs},
    uac::{ResponderType, UserType},
};
use strum::IntoEnumIterator as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CommandName {
    Login,
    Register,
    Logout,
    Refresh,
    Whoami,
    Profile,
    Visit,
    Verify,
    Help,
    Quit,
}

impl CommandName {
    pub fn usage(&self) -> &'static str {
        match self {
            CommandName::Login => "login <email> <password>",
            CommandName::Register => "register <user_type> <email> <password> <confirm_password> <first_name> <last_name> <phone> [driver_license|responder_type]",
            CommandName::Logout => "logout",
            CommandName::Refresh => "refresh",
            CommandName::Whoami => "whoami",
            CommandName::Profile => "profile",
            CommandName::Visit => "visit <path>",
            CommandName::Verify => "verify",
            CommandName::Help => "help",
            CommandName::Quit => "quit",
        }
    }

    pub fn help_text() -> String {
        Self::iter()
            .map(|name| format!("  {}", name.usage()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug)]
pub enum Command {
    Login(LoginReqArgs),
    Register(Box<RegisterReqArgs>),
    Logout,
    Refresh,
    Whoami,
    Profile,
    Visit(String),
    Verify,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            bail!("no command entered");
        };
        let name = CommandName::from_str(&first.to_lowercase())
            .with_context(|| format!("unknown command {first:?}, try `help`"))?;
        let args: Vec<&str> = words.collect();
        let result = match name {
            CommandName::Login => {
                let [email, password] = expect_args::<2>(name, &args)?;
                Command::Login(LoginReqArgs::new(email, password.to_string().into()))
            }
            CommandName::Register => Command::Register(Box::new(parse_register(&args)?)),
            CommandName::Visit => {
                let [path] = expect_args::<1>(name, &args)?;
                Command::Visit(path.to_string())
            }
            CommandName::Logout => no_args(name, &args, Command::Logout)?,
            CommandName::Refresh => no_args(name, &args, Command::Refresh)?,
            CommandName::Whoami => no_args(name, &args, Command::Whoami)?,
            CommandName::Profile => no_args(name, &args, Command::Profile)?,
            CommandName::Verify => no_args(name, &args, Command::Verify)?,
            CommandName::Help => Command::Help,
            CommandName::Quit => Command::Quit,
        };
        Ok(result)
    }
}

fn expect_args<'a, const N: usize>(
    name: CommandName,
    args: &[&'a str],
) -> anyhow::Result<[&'a str; N]> {
    match args.try_into() {
        Ok(result) => Ok(result),
        Err(_) => bail!("usage: {}", name.usage()),
    }
}

fn no_args(name: CommandName, args: &[&str], command: Command) -> anyhow::Result<Command> {
    if !args.is_empty() {
        bail!("usage: {}", name.usage());
    }
    Ok(command)
}

fn parse_register(args: &[&str]) -> anyhow::Result<RegisterReqArgs> {
    let (fixed, extra) = match args.len() {
        7 => (args, None),
        8 => (&args[..7], Some(args[7])),
        _ => bail!("usage: {}", CommandName::Register.usage()),
    };
    let [user_type, email, password, password2, first_name, last_name, phone_number] =
        expect_args::<7>(CommandName::Register, fixed)?;
    let user_type = UserType::from(user_type);
    let mut result = RegisterReqArgs {
        email: email.to_string(),
        password: password.to_string().into(),
        password2: password2.to_string().into(),
        user_type,
        phone_number: phone_number.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        driver_license: None,
        responder_type: None,
    };
    if let Some(extra) = extra {
        if result.user_type.is_driver_kind() {
            result.driver_license = Some(extra.to_string());
        } else if result.user_type == UserType::EmergencyResponder {
            result.responder_type = Some(
                ResponderType::from_str(extra)
                    .with_context(|| format!("{extra:?} is not a known responder type"))?,
            );
        } else {
            bail!("{} does not take an extra argument", result.user_type);
        }
    }
    Ok(result)
}
