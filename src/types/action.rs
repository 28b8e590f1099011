use serde::Serialize;

use crate::types::api::{AttachmentSend, DirectComponent, Embed, File, MessageReference, Snowflake};
use crate::types::event::MessageGet;

macro_rules! impl_payload {
    (
        @[name=$name:ident]
        $(
            #[ $($method_meta:tt)* ]
        )*
        $vi:vis $Payload:ident => $Ret:ty {
            $(
                required {
                    $(
                        $(
                            #[ $($field_meta:tt)* ]
                        )*
                        $v:vis $fields:ident : $FTy:ty
                        ,
                    )*
                }
            )?

            $(
                optional {
                    $(
                        $(
                            #[ $($opt_field_meta:tt)* ]
                        )*
                        $opt_v:vis $opt_fields:ident : $OptFTy:ty
                    ),*
                    $(,)?
                }
            )?
        }
    ) => {
        $(
            #[ $($method_meta)* ]
        )*
        $vi struct $Payload {
            $(
                $(
                    $(
                        #[ $($field_meta)* ]
                    )*
                    $v $fields : $FTy,
                )*
            )?
            $(
                $(
                    $(
                        #[ $($opt_field_meta)* ]
                    )*
                    #[serde(skip_serializing_if = "Option::is_none")]
                    $opt_v $opt_fields : core::option::Option<$OptFTy>,
                )*
            )?
        }

        impl $crate::payload::Payload for $Payload {
            const NAME: &'static str = stringify!($name);
            type Output = $Ret;
        }
    };
}

impl_payload!(
    @[name=create_message]
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub SendMessage => MessageGet {
        optional {
            pub content: String,
            pub embeds: Vec<Embed>,
            pub message_reference: MessageReference,
            pub components: Vec<DirectComponent>,
            pub sticker_ids: Vec<Snowflake>,
            pub attachments: Vec<AttachmentSend>,
            pub files: Vec<File>,
        }
    }
);

impl_payload!(
    @[name=edit_message]
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub EditMessage => MessageGet {
        optional {
            pub content: String,
            pub embeds: Vec<Embed>,
            pub components: Vec<DirectComponent>,
            pub attachments: Vec<AttachmentSend>,
            pub files: Vec<File>,
        }
    }
);
