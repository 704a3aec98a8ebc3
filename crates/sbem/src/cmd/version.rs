use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("sbem {}", env!("CARGO_PKG_VERSION"));
    if args.extended {
        println!("target: {}", env!("SBEM_BUILD_TARGET"));
        println!("profile: {}", env!("SBEM_BUILD_PROFILE"));
        println!("record framing: SBEM0102");
        println!("firmware generations: gen1, gen2, gen3");
    }
    Ok(SUCCESS)
}
