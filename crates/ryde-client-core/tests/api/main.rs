mod access_gate;
mod helpers;
mod login;
mod logout;
mod profile;
mod refresh;
mod register;
