//! Built-in templates rendered when the user supplies no file of their own.
//!
//! Script templates render against the full variable mapping from
//! [`BuildSpec::template_data`](crate::BuildSpec::template_data); the
//! welcome and conclusion pages additionally pass through Markdown
//! conversion.

/// Default welcome page (Markdown).
pub const WELCOME_MD: &str = r#"# {{ app }}

## Welcome to the {{ app }} installer

This package will install {{ app }} version {{ version }} on your computer.
"#;

/// Default conclusion page (Markdown).
pub const CONCLUSION_MD: &str = r#"## {{ app }} Installation Complete

{{ app }} version {{ version }} has been installed.
{{#if uninstall}}

To uninstall, run the uninstall script:

`sudo "/Library/Application Support/{{ app }}/{{ version }}/uninstall.sh"`
{{/if}}
{{#if url}}

### Additional Resources

{{#each url}}
- [{{ name }}]({{ url }})
{{/each}}
{{/if}}
"#;

/// Default uninstall script, installed into the application support
/// directory so users can remove everything the package placed on disk.
pub const UNINSTALL_SH: &str = r#"#!/bin/bash
# Uninstall {{ app }} {{ version }}

if [ "$EUID" -ne 0 ]; then
    echo "This script must be run as root, for example:"
    echo "  sudo \"/Library/Application Support/{{ app }}/{{ version }}/uninstall.sh\""
    exit 1
fi

echo "Uninstalling {{ app }} {{ version }}..."

{{#each link}}
rm -f "{{ target }}"
{{/each}}
{{#each install}}
rm -rf "{{ dest }}"
{{/each}}
rm -rf "/Library/Application Support/{{ app }}/{{ version }}"

echo "{{ app }} {{ version }} has been uninstalled."
"#;

/// Installer preinstall script; delegates to the user's custom script
/// when one was staged next to it.
pub const PREINSTALL: &str = r#"#!/bin/bash
# preinstall for {{ app }} {{ version }}

{{#if pre_install}}
"$(dirname "$0")/custom_preinstall"
{{/if}}

exit 0
"#;

/// Installer postinstall script: chmod directives, symlinks, then the
/// user's custom script when one was staged.
pub const POSTINSTALL: &str = r#"#!/bin/bash
# postinstall for {{ app }} {{ version }}

{{#each chmod}}
chmod {{ mode }} "{{ path }}"
{{/each}}

"$(dirname "$0")/links"

{{#if post_install}}
"$(dirname "$0")/custom_postinstall"
{{/if}}

exit 0
"#;

/// Symlink creation script invoked from postinstall.
pub const LINKS: &str = r#"#!/bin/bash
# create symlinks for {{ app }} {{ version }}

{{#each link}}
ln -sf "{{ source }}" "{{ target }}"
{{/each}}

exit 0
"#;

/// Product `Distribution` descriptor consumed by productbuild. Reflects the
/// identifier and version, plus license and banner presence, so the native
/// tool assembles the correct installer flow.
pub const DISTRIBUTION: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<installer-gui-script minSpecVersion="2">
    <title>{{ app }} {{ version }}</title>
{{#if banner}}
    <background file="banner.png" mime-type="image/png" alignment="bottomleft" scaling="proportional"/>
    <background-darkAqua file="banner.png" mime-type="image/png" alignment="bottomleft" scaling="proportional"/>
{{/if}}
    <welcome file="welcome.html" mime-type="text/html"/>
    <conclusion file="conclusion.html" mime-type="text/html"/>
{{#if license}}
    <license file="LICENSE.txt"/>
{{/if}}
    <options customize="never" require-scripts="true" rootVolumeOnly="true"/>
    <choices-outline>
        <line choice="default">
            <line choice="{{ identifier }}"/>
        </line>
    </choices-outline>
    <choice id="default"/>
    <choice id="{{ identifier }}" visible="false">
        <pkg-ref id="{{ identifier }}"/>
    </choice>
    <pkg-ref id="{{ identifier }}" version="{{ version }}" onConclusion="none">{{ app }}.pkg</pkg-ref>
</installer-gui-script>
"#;
