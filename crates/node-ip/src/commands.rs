//! `show`, `set` and `vipable`.

use common::Result;
use routing::Interface;
use std::io::Write;

use crate::attachment::find_attached;
use crate::cli::{Cli, Commands};
use crate::emitter::ConfigEmitter;
use crate::resolver::{AddressResolver, InterfaceLocator, Sleeper};
use crate::selector::NodeIpSelector;
use crate::types::{ChosenAddress, RetryPolicy, parse_vips};

/// Command runner over injectable host seams.
pub struct App<R, L, S> {
    resolver: R,
    locator: L,
    sleeper: S,
    emitter: ConfigEmitter,
}

impl<R, L, S> App<R, L, S>
where
    R: AddressResolver,
    L: InterfaceLocator,
    S: Sleeper,
{
    pub fn new(resolver: R, locator: L, sleeper: S, emitter: ConfigEmitter) -> Self {
        Self {
            resolver,
            locator,
            sleeper,
            emitter,
        }
    }

    fn select(&self, args: &[String], policy: RetryPolicy) -> Result<ChosenAddress> {
        let vips = parse_vips(args)?;
        NodeIpSelector::new(&self.resolver, &self.sleeper).select(&vips, policy)
    }

    /// Print the chosen address as a single line on `out`.
    pub fn show<W: Write>(
        &self,
        args: &[String],
        policy: RetryPolicy,
        out: &mut W,
    ) -> Result<ChosenAddress> {
        let chosen = self.select(args, policy)?;
        writeln!(out, "{}", chosen)?;
        out.flush()?;
        Ok(chosen)
    }

    /// Write both service overrides for the chosen address.
    pub fn set(&self, args: &[String], policy: RetryPolicy) -> Result<ChosenAddress> {
        let chosen = self.select(args, policy)?;
        self.emitter.emit(&chosen)?;
        Ok(chosen)
    }

    /// Succeed when any VIP is attached to a local interface.
    pub fn vipable(&self, args: &[String]) -> Result<Interface> {
        let vips = parse_vips(args)?;
        let (_, iface) = find_attached(&self.locator, &vips)?;
        Ok(iface)
    }

    /// Run the parsed command line.
    pub fn dispatch<W: Write>(&self, cli: &Cli, out: &mut W) -> Result<()> {
        let policy = RetryPolicy::new(cli.retry_on_failure);
        match &cli.command {
            Commands::Show { vips } => self.show(vips, policy, out).map(drop),
            Commands::Set { vips } => self.set(vips, policy).map(drop),
            Commands::Vipable { vips } => self.vipable(vips).map(drop),
        }
    }
}
