//! Stage 2: clip forward and reverse primers with cutadapt.

use std::path::Path;

use crate::config::Config;
use crate::consts::{STAGE_LOG, TRIMMED_TAG};
use crate::discovery;
use crate::error::Result;
use crate::naming;
use crate::runner::{run_cmd, CmdOptions};

pub fn run(config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    log::info!("using cutadapt \"{}\"", config.tools.cutadapt);
    let log_path = output_dir.join(STAGE_LOG);

    for forward in discovery::forward_read_files(input_dir)? {
        let reverse = discovery::associated_reverse_file(&forward)?;
        log::info!("removing primers from pair \"{}\"", forward.display());

        // trimmed output names derive from the forward basename, with the
        // mate digit flipped for the reverse file
        let forward_name = naming::read_name_of(&forward)?;
        let trimmed_forward =
            output_dir.join(forward_name.clone().tagged(TRIMMED_TAG).render());
        let trimmed_reverse =
            output_dir.join(forward_name.tagged(TRIMMED_TAG).with_mate(2).render());

        run_cmd(
            &[
                config.tools.cutadapt.clone(),
                "-a".to_string(),
                config.forward_primer.clone(),
                "-A".to_string(),
                config.reverse_primer.clone(),
                "-o".to_string(),
                trimmed_forward.display().to_string(),
                "-p".to_string(),
                trimmed_reverse.display().to_string(),
                "-m".to_string(),
                config.cutadapt_min_length.to_string(),
                forward.display().to_string(),
                reverse.display().to_string(),
            ],
            &log_path,
            &CmdOptions::default(),
        )?;
    }

    Ok(())
}
