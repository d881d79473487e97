//! Decode call data back into arguments

use clap::Args;
use color_eyre::eyre::Result;

use calltree_core::decode_call;

use super::{load_abi, MethodArgs};

/// Decode call data back into arguments
#[derive(Args)]
pub struct DecodeCommand {
    #[command(flatten)]
    pub target: MethodArgs,

    /// 0x-prefixed call data, including the selector
    pub data: String,
}

impl DecodeCommand {
    pub fn run(self) -> Result<()> {
        let abi = load_abi(&self.target.abi)?;
        let function = abi.function(&self.target.method)?;

        let data = hex::decode(self.data.trim().trim_start_matches("0x"))?;
        let values = decode_call(function, &data)?;
        println!("{}", serde_json::to_string_pretty(&values)?);
        Ok(())
    }
}
