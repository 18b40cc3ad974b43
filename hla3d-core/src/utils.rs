use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> std::io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Union of all the value sets of a mapping.
///
/// # Arguments
/// - values: the value sets, e.g. `map.values()`
pub fn flatten_dict_values<'a, V, I>(values: I) -> BTreeSet<V>
where
    V: Ord + Clone + 'a,
    I: IntoIterator<Item = &'a BTreeSet<V>>,
{
    values.into_iter().flatten().cloned().collect()
}
